use zenimage::{FileFormat, Image, Limits, MemoryStream, PixelFormat, Stream, Whence};

fn write_u16_le(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}
fn write_u32_le(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}
fn write_i32_le(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Hand-build a minimal 24 bpp `BI_RGB` BMP with the given (possibly
/// negative) height, so both the top-down and bottom-up decode paths can
/// be exercised directly.
fn build_bmp_24(width: u32, height: i32, rows_top_to_bottom: &[[u8; 3]]) -> Vec<u8> {
    let stride = ((width as usize * 3 + 3) / 4) * 4;
    let pixel_data_size = stride * rows_top_to_bottom.len() / width as usize;
    let mut buf = Vec::new();
    buf.extend_from_slice(b"BM");
    write_u32_le(&mut buf, 0); // file size, unchecked by our decoder
    write_u16_le(&mut buf, 0);
    write_u16_le(&mut buf, 0);
    write_u32_le(&mut buf, 54); // pixel data offset
    write_u32_le(&mut buf, 40); // DIB header size
    write_i32_le(&mut buf, width as i32);
    write_i32_le(&mut buf, height);
    write_u16_le(&mut buf, 1);
    write_u16_le(&mut buf, 24);
    write_u32_le(&mut buf, 0); // BI_RGB
    write_u32_le(&mut buf, pixel_data_size as u32);
    write_i32_le(&mut buf, 0);
    write_i32_le(&mut buf, 0);
    write_u32_le(&mut buf, 0);
    write_u32_le(&mut buf, 0);

    // `rows_top_to_bottom` is given top row first; BMP file-row order for
    // height > 0 ("flipped" in this codec's sense) is also top row first.
    let abs_h = height.unsigned_abs() as usize;
    for row in 0..abs_h {
        let px = rows_top_to_bottom[row * width as usize..(row + 1) * width as usize].to_vec();
        for [r, g, b] in px {
            buf.push(b);
            buf.push(g);
            buf.push(r);
        }
        for _ in 0..(stride - width as usize * 3) {
            buf.push(0);
        }
    }
    buf
}

#[test]
fn decode_24bpp_positive_height_is_top_down() {
    // height > 0 => already top-down in this codec's convention, no flip.
    let rows = [[255u8, 0, 0], [0, 255, 0], [0, 0, 255], [0, 0, 0]];
    let bytes = build_bmp_24(2, 2, &rows);
    let mut stream = MemoryStream::from_vec(bytes);
    let image = zenimage::read_image(
        &mut stream,
        FileFormat::Bmp,
        None,
        &Limits::default(),
    )
    .unwrap();
    assert_eq!(image.format(), PixelFormat::Bgr);
    let direct = image.convert(PixelFormat::Rgb).unwrap();
    assert_eq!(&direct.pixels()[0..3], &[255, 0, 0]);
    assert_eq!(&direct.pixels()[3..6], &[0, 255, 0]);
}

#[test]
fn decode_24bpp_negative_height_flips() {
    // `build_bmp_24`'s row slice is the literal file storage order.
    // height < 0 flips on read, so file row 0 ("red") ends up last and
    // file row 1 ("green") ends up first in the decoded image.
    let file_rows = [[255u8, 0, 0], [0, 255, 0]];
    let bytes = build_bmp_24(1, -2, &file_rows);
    let mut stream = MemoryStream::from_vec(bytes);
    let image =
        zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default()).unwrap();
    let direct = image.convert(PixelFormat::Rgb).unwrap();
    assert_eq!(&direct.pixels()[0..3], &[0, 255, 0]);
    assert_eq!(&direct.pixels()[3..6], &[255, 0, 0]);
}

#[test]
fn encode_then_decode_round_trips_colors() {
    let pixels = vec![10u8, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
    let image = Image::from_parts(2, 2, PixelFormat::Rgb, pixels, None).unwrap();
    let bgr = image.convert(PixelFormat::Bgr).unwrap();

    let mut out = MemoryStream::new();
    zenimage::write_image(&bgr, FileFormat::Bmp, &mut out).unwrap();

    let mut in_stream = MemoryStream::from_vec(out.into_vec());
    let decoded = zenimage::read_image(&mut in_stream, FileFormat::Bmp, None, &Limits::default())
        .unwrap();
    let decoded_rgb = decoded.convert(PixelFormat::Rgb).unwrap();
    assert_eq!(decoded_rgb.pixels(), image.pixels());
}

/// Hand-build a `BI_RGB` BMP with an `n`-bit indexed palette and a row of
/// palette indices, given top row first.
fn build_bmp_indexed(
    width: u32,
    height: i32,
    bpp: u16,
    palette_bgr: &[[u8; 3]],
    rows_top_to_bottom_indices: &[Vec<u8>],
) -> Vec<u8> {
    let palette_bytes = palette_bgr.len() * 4;
    let pixel_data_offset = 54 + palette_bytes;
    let stride = row_stride(width, bpp);
    let abs_h = height.unsigned_abs() as usize;

    let mut buf = Vec::new();
    buf.extend_from_slice(b"BM");
    write_u32_le(&mut buf, 0);
    write_u16_le(&mut buf, 0);
    write_u16_le(&mut buf, 0);
    write_u32_le(&mut buf, pixel_data_offset as u32);
    write_u32_le(&mut buf, 40);
    write_i32_le(&mut buf, width as i32);
    write_i32_le(&mut buf, height);
    write_u16_le(&mut buf, 1);
    write_u16_le(&mut buf, bpp);
    write_u32_le(&mut buf, 0); // BI_RGB
    write_u32_le(&mut buf, (stride * abs_h) as u32);
    write_i32_le(&mut buf, 0);
    write_i32_le(&mut buf, 0);
    write_u32_le(&mut buf, palette_bgr.len() as u32);
    write_u32_le(&mut buf, 0);

    for [b, g, r] in palette_bgr {
        buf.push(*b);
        buf.push(*g);
        buf.push(*r);
        buf.push(0);
    }

    for row in rows_top_to_bottom_indices {
        let mut packed = vec![0u8; stride];
        match bpp {
            8 => packed[..row.len()].copy_from_slice(row),
            4 => {
                for (i, &idx) in row.iter().enumerate() {
                    if i % 2 == 0 {
                        packed[i / 2] |= idx << 4;
                    } else {
                        packed[i / 2] |= idx & 0x0f;
                    }
                }
            }
            1 => {
                for (i, &idx) in row.iter().enumerate() {
                    if idx != 0 {
                        packed[i / 8] |= 0x80 >> (i % 8);
                    }
                }
            }
            _ => unreachable!(),
        }
        buf.extend_from_slice(&packed);
    }
    buf
}

fn row_stride(width: u32, bpp: u16) -> usize {
    let bits_per_row = width as usize * bpp as usize;
    ((bits_per_row + 31) / 32) * 4
}

fn build_bmp_16_or_32(width: u32, height: i32, bpp: u16, rows_top_to_bottom: &[Vec<u8>]) -> Vec<u8> {
    let stride = row_stride(width, bpp);
    let abs_h = height.unsigned_abs() as usize;
    let mut buf = Vec::new();
    buf.extend_from_slice(b"BM");
    write_u32_le(&mut buf, 0);
    write_u16_le(&mut buf, 0);
    write_u16_le(&mut buf, 0);
    write_u32_le(&mut buf, 54);
    write_u32_le(&mut buf, 40);
    write_i32_le(&mut buf, width as i32);
    write_i32_le(&mut buf, height);
    write_u16_le(&mut buf, 1);
    write_u16_le(&mut buf, bpp);
    write_u32_le(&mut buf, 0);
    write_u32_le(&mut buf, (stride * abs_h) as u32);
    write_i32_le(&mut buf, 0);
    write_i32_le(&mut buf, 0);
    write_u32_le(&mut buf, 0);
    write_u32_le(&mut buf, 0);
    for row in rows_top_to_bottom {
        let mut padded = row.clone();
        padded.resize(stride, 0);
        buf.extend_from_slice(&padded);
    }
    buf
}

#[test]
fn decode_8bpp_resolves_indices_through_palette_to_bgr() {
    // Palette entries stored BGRX in the file; index 0 is red, index 1 blue.
    let palette = [[0u8, 0, 255], [255, 0, 0]];
    let bytes = build_bmp_indexed(2, 1, 8, &palette, &[vec![0, 1]]);
    let mut stream = MemoryStream::from_vec(bytes);
    let image = zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default())
        .unwrap();
    assert_eq!(image.format(), PixelFormat::Bgr);
    // Decoded pixel bytes are BGR triples resolved from the palette, not indices.
    assert_eq!(&image.pixels()[0..3], &[0, 0, 255]); // red (R=255) palette entry -> BGR bytes
    assert_eq!(&image.pixels()[3..6], &[255, 0, 0]); // blue (B=255) palette entry -> BGR bytes
}

#[test]
fn decode_4bpp_resolves_indices_through_palette() {
    let palette = [
        [0u8, 0, 0],
        [255, 255, 255],
        [0, 0, 0],
        [0, 0, 0],
    ];
    let bytes = build_bmp_indexed(2, 1, 4, &palette, &[vec![1, 0]]);
    let mut stream = MemoryStream::from_vec(bytes);
    let image = zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default())
        .unwrap();
    assert_eq!(image.format(), PixelFormat::Bgr);
    assert_eq!(&image.pixels()[0..3], &[255, 255, 255]);
    assert_eq!(&image.pixels()[3..6], &[0, 0, 0]);
}

#[test]
fn decode_1bpp_resolves_indices_through_palette() {
    let palette = [[0u8, 0, 0], [255, 255, 255]];
    let bytes = build_bmp_indexed(8, 1, 1, &palette, &[vec![1, 0, 1, 0, 1, 0, 1, 0]]);
    let mut stream = MemoryStream::from_vec(bytes);
    let image = zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default())
        .unwrap();
    assert_eq!(image.format(), PixelFormat::Bgr);
    assert_eq!(&image.pixels()[0..3], &[255, 255, 255]);
    assert_eq!(&image.pixels()[3..6], &[0, 0, 0]);
}

#[test]
fn decode_16bpp_expands_555_channels_to_bgr() {
    // 0x7C00 = high 5 bits of R set (all-ones R5, zero G5/B5).
    let row = vec![0x00u8, 0x7C, 0xFF, 0xFF];
    let bytes = build_bmp_16_or_32(2, 1, 16, &[row]);
    let mut stream = MemoryStream::from_vec(bytes);
    let image = zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default())
        .unwrap();
    assert_eq!(image.format(), PixelFormat::Bgr);
    // Pixel 0: R5=0x1f, G5=0, B5=0 => BGR = (0, 0, 255).
    assert_eq!(&image.pixels()[0..3], &[0, 0, 255]);
    // Pixel 1: all 15 bits set => full white.
    assert_eq!(&image.pixels()[3..6], &[255, 255, 255]);
}

#[test]
fn decode_32bpp_discards_fourth_byte() {
    // BGRX pixel with a nonzero X (alpha/padding) byte that must not survive.
    let row = vec![10u8, 20, 30, 99];
    let bytes = build_bmp_16_or_32(1, 1, 32, &[row]);
    let mut stream = MemoryStream::from_vec(bytes);
    let image = zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default())
        .unwrap();
    assert_eq!(image.format(), PixelFormat::Bgr);
    assert_eq!(image.pixels(), &[10, 20, 30]);
}

#[test]
fn decode_seeks_pixel_data_relative_to_stream_start() {
    // Embed the BMP after a non-zero prefix, simulating a BMP probed
    // mid-buffer (e.g. during auto-detect), and position the stream past
    // the prefix before decoding.
    let rows = [[255u8, 0, 0], [0, 255, 0]];
    let bmp_bytes = build_bmp_24(1, 2, &rows);
    let mut combined = vec![0xAAu8; 16];
    combined.extend_from_slice(&bmp_bytes);

    let mut stream = MemoryStream::from_vec(combined);
    stream.seek(16, Whence::Begin);
    let image = zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default())
        .unwrap();
    let direct = image.convert(PixelFormat::Rgb).unwrap();
    assert_eq!(&direct.pixels()[0..3], &[255, 0, 0]);
    assert_eq!(&direct.pixels()[3..6], &[0, 255, 0]);
}

#[test]
fn zero_height_is_rejected() {
    let mut bytes = build_bmp_24(1, 1, &[[1, 2, 3]]);
    // Corrupt the height field (offset 22, i32 LE) to zero.
    bytes[22..26].copy_from_slice(&0i32.to_le_bytes());
    let mut stream = MemoryStream::from_vec(bytes);
    let result = zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default());
    assert!(result.is_err());
}

#[test]
fn unsupported_compression_is_rejected() {
    let mut bytes = build_bmp_24(1, 1, &[[1, 2, 3]]);
    // Corrupt the compression field (offset 30) to BI_RLE8 (1).
    bytes[30] = 1;
    let mut stream = MemoryStream::from_vec(bytes);
    let result = zenimage::read_image(&mut stream, FileFormat::Bmp, None, &Limits::default());
    assert!(result.is_err());
}
