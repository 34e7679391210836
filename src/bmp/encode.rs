//! BMP writer: 24 bpp, `BI_RGB`, bottom-up (positive height).

use crate::byteio::{ByteWriter, Endian};
use crate::error::ImageError;
use crate::format::PixelFormat;
use crate::image::Image;
use crate::stream::Stream;

const FILE_HEADER_SIZE: u32 = 14;
const DIB_HEADER_SIZE: u32 = 40;

fn row_stride(width: u32) -> usize {
    ((width as usize * 3 + 3) / 4) * 4
}

/// Encode `image` as 24 bpp BMP. `image` must already be in [`PixelFormat::Bgr`];
/// callers convert with [`Image::convert`] first.
pub fn encode<S: Stream + ?Sized>(image: &Image, stream: &mut S) -> Result<(), ImageError> {
    if image.format() != PixelFormat::Bgr {
        return Err(ImageError::UnsupportedConversion {
            from: image.format(),
            to: PixelFormat::Bgr,
        });
    }

    let width = image.width();
    let height = image.height();
    let stride = row_stride(width);
    let pixel_data_size = stride * height as usize;
    let file_size = FILE_HEADER_SIZE + DIB_HEADER_SIZE + pixel_data_size as u32;
    let pixel_data_offset = FILE_HEADER_SIZE + DIB_HEADER_SIZE;

    let mut w = ByteWriter::with_endian(stream, Endian::Little);
    w.write_bytes(b"BM")?;
    w.write_u32(file_size)?;
    w.write_u16(0)?;
    w.write_u16(0)?;
    w.write_u32(pixel_data_offset)?;

    w.write_u32(DIB_HEADER_SIZE)?;
    w.write_i32(width as i32)?;
    // Always written bottom-up (positive height), regardless of how the
    // source pixels were ordered on read.
    w.write_i32(height as i32)?;
    w.write_u16(1)?; // planes
    w.write_u16(24)?; // bpp
    w.write_u32(0)?; // BI_RGB
    w.write_u32(pixel_data_size as u32)?;
    w.write_i32(0)?; // x pixels/meter
    w.write_i32(0)?; // y pixels/meter
    w.write_u32(0)?; // colors used
    w.write_u32(0)?; // colors important

    let pixels = image.pixels();
    let src_stride = width as usize * 3;
    let mut row_buf = alloc::vec![0u8; stride];
    for row in 0..height as usize {
        // Bottom-up output: the last source row is written first.
        let src_row = height as usize - 1 - row;
        let src = &pixels[src_row * src_stride..src_row * src_stride + src_stride];
        row_buf[..src_stride].copy_from_slice(src);
        for pad in row_buf[src_stride..].iter_mut() {
            *pad = 0;
        }
        w.write_bytes(&row_buf)?;
    }
    Ok(())
}
