//! JPEG codec, bridging [`Image`]/[`Stream`] to `jpeg-decoder`/`jpeg-encoder`.
//!
//! RGB only at the codec boundary — JPEG has no alpha channel, so callers
//! must convert to [`PixelFormat::Rgb`] before encoding, and decode always
//! produces [`PixelFormat::Rgb`].

use alloc::vec::Vec;

use crate::error::ImageError;
use crate::format::PixelFormat;
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

/// Decode a JPEG image from `stream`. Grayscale and CMYK source data is
/// expanded to RGB by the decoder.
pub fn decode<S: Stream + ?Sized>(stream: &mut S, limits: &Limits) -> Result<Image, ImageError> {
    let mut decoder = jpeg_decoder::Decoder::new(StreamReader(stream));
    let pixels = decoder.decode()?;
    let info = decoder
        .info()
        .ok_or_else(|| ImageError::DecoderInternal("jpeg: missing frame info".into()))?;
    let width = info.width as u32;
    let height = info.height as u32;
    limits.check(width, height)?;

    let rgb: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.into_iter().flat_map(|v| [v, v, v]).collect(),
        jpeg_decoder::PixelFormat::L16 => {
            return Err(ImageError::DecoderInternal(
                "jpeg: 16-bit grayscale not supported".into(),
            ));
        }
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|c| {
                let k = c[3] as u32;
                let r = 255 - ((255 - c[0] as u32) * k / 255);
                let g = 255 - ((255 - c[1] as u32) * k / 255);
                let b = 255 - ((255 - c[2] as u32) * k / 255);
                [r as u8, g as u8, b as u8]
            })
            .collect(),
    };

    limits.check_memory(rgb.len())?;
    Image::from_parts(width, height, PixelFormat::Rgb, rgb, None)
}

/// Encode `image` as JPEG at `quality` (0-100). `image` must already be in
/// [`PixelFormat::Rgb`]; callers convert with [`Image::convert`] first.
pub fn encode<S: Stream + ?Sized>(
    image: &Image,
    stream: &mut S,
    quality: u8,
) -> Result<(), ImageError> {
    if image.format() != PixelFormat::Rgb {
        return Err(ImageError::UnsupportedConversion {
            from: image.format(),
            to: PixelFormat::Rgb,
        });
    }
    let encoder = jpeg_encoder::Encoder::new(StreamWriter(stream), quality);
    encoder.encode(
        image.pixels(),
        image.width() as u16,
        image.height() as u16,
        jpeg_encoder::ColorType::Rgb,
    )?;
    Ok(())
}
