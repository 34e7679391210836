//! BMP reader: BITMAPFILEHEADER + BITMAPINFOHEADER (40-byte, `BI_RGB` only).

use alloc::vec;

use crate::bmp::utils::expand_bits_to_byte;
use crate::byteio::{ByteReader, Endian};
use crate::error::ImageError;
use crate::format::{Palette, PixelFormat};
use crate::image::Image;
use crate::limits::Limits;
use crate::stream::Stream;

const BI_RGB: u32 = 0;

struct Header {
    width: i32,
    height: i32,
    bpp: u16,
    colors_used: u32,
    pixel_data_offset: u32,
}

fn read_header<S: Stream + ?Sized>(r: &mut ByteReader<'_, S>) -> Result<Header, ImageError> {
    let mut magic = [0u8; 2];
    r.read_bytes(&mut magic)?;
    if &magic != b"BM" {
        return Err(ImageError::FormatMismatch("missing 'BM' magic".into()));
    }
    let _file_size = r.read_u32()?;
    let _reserved1 = r.read_u16()?;
    let _reserved2 = r.read_u16()?;
    let pixel_data_offset = r.read_u32()?;

    let ihsize = r.read_u32()?;
    if ihsize != 40 {
        return Err(ImageError::FormatMismatch(alloc::format!(
            "unsupported DIB header size {ihsize}, only the 40-byte BITMAPINFOHEADER is supported"
        )));
    }
    let width = r.read_i32()?;
    let height = r.read_i32()?;
    let _planes = r.read_u16()?;
    let bpp = r.read_u16()?;
    let compression = r.read_u32()?;
    let _image_size = r.read_u32()?;
    let _x_ppm = r.read_i32()?;
    let _y_ppm = r.read_i32()?;
    let colors_used = r.read_u32()?;
    let _colors_important = r.read_u32()?;

    if compression != BI_RGB {
        return Err(ImageError::FormatMismatch(alloc::format!(
            "unsupported BMP compression {compression}, only BI_RGB is supported"
        )));
    }
    if !matches!(bpp, 1 | 4 | 8 | 16 | 24 | 32) {
        return Err(ImageError::FormatMismatch(alloc::format!(
            "unsupported BMP bit depth {bpp}"
        )));
    }
    if width <= 0 {
        return Err(ImageError::FormatMismatch(alloc::format!(
            "non-positive BMP width {width}"
        )));
    }
    if height == 0 {
        return Err(ImageError::FormatMismatch("BMP height is zero".into()));
    }
    if colors_used > 255 {
        return Err(ImageError::FormatMismatch(alloc::format!(
            "BMP colors-used {colors_used} exceeds 255"
        )));
    }

    Ok(Header {
        width,
        height,
        bpp,
        colors_used,
        pixel_data_offset,
    })
}

fn row_stride(width: u32, bpp: u16) -> usize {
    let bits_per_row = width as usize * bpp as usize;
    ((bits_per_row + 31) / 32) * 4
}

fn read_palette<S: Stream + ?Sized>(
    r: &mut ByteReader<'_, S>,
    colors: usize,
) -> Result<Palette, ImageError> {
    let mut palette = Palette::default();
    for entry in palette.0.iter_mut().take(colors) {
        let mut bgrx = [0u8; 4];
        r.read_bytes(&mut bgrx)?;
        *entry = [bgrx[2], bgrx[1], bgrx[0]];
    }
    Ok(palette)
}

/// Decode a BMP image from `stream`. `stream` is consumed from its current
/// position; the caller is responsible for any seeking needed beforehand.
/// The output image is always [`PixelFormat::Bgr`] — palette indices and
/// the discarded alpha byte of 32 bpp pixels never escape this function.
pub fn decode<S: Stream + ?Sized>(stream: &mut S, limits: &Limits) -> Result<Image, ImageError> {
    let start = stream.tell();
    let mut r = ByteReader::with_endian(stream, Endian::Little);
    let header = read_header(&mut r)?;

    let width = header.width.unsigned_abs();
    // `height > 0` means rows are stored top-down already ("flipped" in
    // the sense used by this codec); only a negative height triggers a
    // bottom-up-to-top-down flip on read. This is intentionally the
    // inverse of the conventional BMP height-sign meaning.
    let flipped = header.height > 0;
    let abs_height = header.height.unsigned_abs();

    limits.check(width, abs_height)?;

    let palette = match header.bpp {
        1 | 4 | 8 => {
            let max_colors = 1usize << header.bpp;
            let n = if header.colors_used == 0 {
                max_colors
            } else {
                (header.colors_used as usize).min(max_colors)
            };
            Some(read_palette(&mut r, n)?)
        }
        _ => None,
    };

    // Seek to the pixel data relative to the stream's starting position, not
    // absolute offset 0 — the stream may not begin at the start of the file
    // (e.g. a BMP probed mid-buffer during auto-detect).
    r.stream_mut().seek(
        start as i64 + header.pixel_data_offset as i64,
        crate::stream::Whence::Begin,
    );

    let stride = row_stride(width, header.bpp);
    let mut row_buf = vec![0u8; stride];

    let out_bpp = 3;
    let out_format = PixelFormat::Bgr;

    let out_bytes = (width as usize)
        .saturating_mul(abs_height as usize)
        .saturating_mul(out_bpp);
    limits.check_memory(out_bytes)?;
    let mut pixels = vec![0u8; out_bytes];

    let mut index_row = vec![0u8; width as usize];
    for row in 0..abs_height as usize {
        r.read_bytes(&mut row_buf)?;
        let dest_row = if flipped {
            row
        } else {
            abs_height as usize - 1 - row
        };
        let dest = &mut pixels[dest_row * width as usize * out_bpp
            ..(dest_row + 1) * width as usize * out_bpp];
        decode_row(
            header.bpp,
            &row_buf,
            width as usize,
            dest,
            palette.as_ref(),
            &mut index_row,
        );
    }

    Image::from_parts(width, abs_height, out_format, pixels, None)
}

fn decode_row(
    bpp: u16,
    row: &[u8],
    width: usize,
    dest: &mut [u8],
    palette: Option<&Palette>,
    index_row: &mut [u8],
) {
    match bpp {
        1 | 4 => {
            expand_bits_to_byte(bpp as usize, true, row, index_row);
            resolve_indices_to_bgr(index_row, palette, dest);
        }
        8 => {
            index_row.copy_from_slice(&row[..width]);
            resolve_indices_to_bgr(index_row, palette, dest);
        }
        16 => {
            for (i, dst) in dest.chunks_exact_mut(3).enumerate().take(width) {
                let lo = row[i * 2];
                let hi = row[i * 2 + 1];
                let v = u16::from_le_bytes([lo, hi]);
                dst[0] = expand_5bit((v & 0x1f) as u8); // B
                dst[1] = expand_5bit(((v >> 5) & 0x1f) as u8); // G
                dst[2] = expand_5bit(((v >> 10) & 0x1f) as u8); // R
            }
        }
        24 => {
            dest[..width * 3].copy_from_slice(&row[..width * 3]);
        }
        32 => {
            // Low three bytes of each 4-byte pixel are BGR; the fourth is
            // discarded, not carried forward as alpha.
            for (i, dst) in dest.chunks_exact_mut(3).enumerate().take(width) {
                dst.copy_from_slice(&row[i * 4..i * 4 + 3]);
            }
        }
        _ => unreachable!(),
    }
}

/// Resolve a row of 8-bit palette indices to BGR triples.
fn resolve_indices_to_bgr(indices: &[u8], palette: Option<&Palette>, dest: &mut [u8]) {
    let palette = palette.expect("1/4/8 bpp BMP always carries a palette");
    for (idx, dst) in indices.iter().zip(dest.chunks_exact_mut(3)) {
        let [r, g, b] = palette.get(*idx);
        dst[0] = b;
        dst[1] = g;
        dst[2] = r;
    }
}

/// 5-bit to 8-bit channel expansion, preserving exact zero: only spreads
/// the low 3 bits into place when the high 5 bits are nonzero.
fn expand_5bit(x5: u8) -> u8 {
    let mut v = x5 << 3;
    if x5 != 0 {
        v |= 0x07;
    }
    v
}
