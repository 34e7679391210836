//! PNG codec, bridging [`Image`]/[`Stream`] to the `png` crate.

use alloc::vec;
use alloc::vec::Vec;

use crate::byteio::{ByteReader, Endian};
use crate::error::ImageError;
use crate::format::{Palette, PixelFormat};
use crate::image::Image;
use crate::limits::Limits;
use crate::stream::Stream;

struct StreamReader<'s, S: Stream + ?Sized>(&'s mut S);

impl<'s, S: Stream + ?Sized> std::io::Read for StreamReader<'s, S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(self.0.read(buf))
    }
}

struct StreamWriter<'s, S: Stream + ?Sized>(&'s mut S);

impl<'s, S: Stream + ?Sized> std::io::Write for StreamWriter<'s, S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(self.0.write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush().map_err(std::io::Error::other)
    }
}

const PNG_COLOR_TYPE_PALETTE: u8 = 3;

/// Peek the IHDR chunk's bit depth and color type without disturbing the
/// rest of the decode: the `png` crate's transformations must be chosen
/// before `read_info()` is called, but which transformation we want (plain
/// `EXPAND`, or none at all to keep palette indices raw) depends on the
/// color type that only IHDR reveals.
fn peek_ihdr<S: Stream + ?Sized>(stream: &mut S) -> Result<(u8, u8), ImageError> {
    let mut r = ByteReader::with_endian(stream, Endian::Big);
    let mut sig = [0u8; 8];
    r.read_bytes(&mut sig)?;
    let _length = r.read_u32()?;
    let mut chunk_type = [0u8; 4];
    r.read_bytes(&mut chunk_type)?;
    if &chunk_type != b"IHDR" {
        return Err(ImageError::FormatMismatch("PNG missing IHDR chunk".into()));
    }
    let _width = r.read_u32()?;
    let _height = r.read_u32()?;
    let bit_depth = r.read_u8()?;
    let color_type = r.read_u8()?;
    Ok((bit_depth, color_type))
}

/// Decode a PNG image from `stream`.
///
/// Color types map onto this crate's [`PixelFormat`] as: 8-bit palette maps
/// to [`PixelFormat::RgbP8`] with the PLTE chunk copied into the Image's
/// palette; grayscale expands to RGB (palette/grayscale transparency is
/// folded into an alpha channel); 16-bit channels are stripped to 8-bit;
/// RGB/RGBA pass through directly.
pub fn decode<S: Stream + ?Sized>(stream: &mut S, limits: &Limits) -> Result<Image, ImageError> {
    let start = stream.tell();
    let (bit_depth, color_type) = peek_ihdr(stream)?;
    stream.seek(start as i64, crate::stream::Whence::Begin);

    // Only 8-bit-depth palette images are decoded as RgbP8 with raw
    // indices; anything else (including sub-8-bit palette, out of scope
    // here) falls back to the EXPAND path and comes back as direct color.
    let is_indexed = color_type == PNG_COLOR_TYPE_PALETTE && bit_depth == 8;

    let mut decoder = png::Decoder::new(StreamReader(stream));
    let mut transformations = png::Transformations::STRIP_16;
    if !is_indexed {
        transformations |= png::Transformations::EXPAND;
    }
    decoder.set_transformations(transformations);
    let mut reader = decoder.read_info()?;
    let info = reader.info();
    let width = info.width;
    let height = info.height;
    limits.check(width, height)?;
    let palette_bytes: Option<Vec<u8>> = info.palette.as_ref().map(|p| p.to_vec());

    if is_indexed {
        let out_bytes = width as usize * height as usize;
        limits.check_memory(out_bytes)?;
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buf)?;
        let row_bytes = frame.line_size;

        let mut pixels = vec![0u8; out_bytes];
        for row in 0..height as usize {
            let src_row = &buf[row * row_bytes..row * row_bytes + width as usize];
            let dst_row = &mut pixels[row * width as usize..(row + 1) * width as usize];
            dst_row.copy_from_slice(src_row);
        }

        let mut palette = Palette::default();
        if let Some(raw) = &palette_bytes {
            for (i, entry) in raw.chunks_exact(3).take(256).enumerate() {
                palette.0[i] = [entry[0], entry[1], entry[2]];
            }
        }
        return Image::from_parts(width, height, PixelFormat::RgbP8, pixels, Some(palette));
    }

    let has_alpha = matches!(
        info.color_type,
        png::ColorType::GrayscaleAlpha | png::ColorType::Rgba
    ) || info.trns.is_some();
    let format = if has_alpha {
        PixelFormat::Rgba
    } else {
        PixelFormat::Rgb
    };

    let bpp = format.bytes_per_pixel();
    let out_bytes = width as usize * height as usize * bpp;
    limits.check_memory(out_bytes)?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let row_bytes = frame.line_size;
    let src_channels = match frame.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => 1,
    };

    let mut pixels = vec![0u8; out_bytes];
    for row in 0..height as usize {
        let src_row = &buf[row * row_bytes..row * row_bytes + width as usize * src_channels];
        let dst_row = &mut pixels[row * width as usize * bpp..(row + 1) * width as usize * bpp];
        for x in 0..width as usize {
            let s = &src_row[x * src_channels..x * src_channels + src_channels];
            let (r, g, b, a) = match src_channels {
                1 => (s[0], s[0], s[0], 255),
                2 => (s[0], s[0], s[0], s[1]),
                3 => (s[0], s[1], s[2], 255),
                4 => (s[0], s[1], s[2], s[3]),
                _ => unreachable!(),
            };
            let d = &mut dst_row[x * bpp..x * bpp + bpp];
            d[0] = r;
            d[1] = g;
            d[2] = b;
            if bpp == 4 {
                d[3] = a;
            }
        }
    }

    Image::from_parts(width, height, format, pixels, None)
}

/// Encode `image` as PNG. Accepts [`PixelFormat::RgbP8`], [`PixelFormat::Rgb`],
/// or [`PixelFormat::Rgba`]; callers convert with [`Image::convert`] first.
pub fn encode<S: Stream + ?Sized>(image: &Image, stream: &mut S) -> Result<(), ImageError> {
    if image.format() == PixelFormat::RgbP8 {
        let palette = image
            .palette()
            .ok_or_else(|| ImageError::InvalidInput("indexed image missing palette".into()))?;
        let mut flat = Vec::with_capacity(768);
        for entry in palette.0.iter() {
            flat.extend_from_slice(entry);
        }
        let mut encoder = png::Encoder::new(StreamWriter(stream), image.width(), image.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(flat);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.pixels())?;
        return Ok(());
    }

    let color_type = match image.format() {
        PixelFormat::Rgb => png::ColorType::Rgb,
        PixelFormat::Rgba => png::ColorType::Rgba,
        other => {
            return Err(ImageError::UnsupportedConversion {
                from: other,
                to: PixelFormat::Rgba,
            });
        }
    };

    let mut encoder = png::Encoder::new(StreamWriter(stream), image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.pixels())?;
    Ok(())
}
