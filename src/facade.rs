//! High-level entry points: file format detection, `ReadImage`/`WriteImage`.

use alloc::vec::Vec;

use crate::error::ImageError;
use crate::format::{Palette, PixelFormat};
use crate::image::Image;
use crate::limits::Limits;
use crate::stream::{MemoryStream, Stream, Whence};

/// Mode to open a file stream in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    In,
    Out,
}

/// Open a file stream for reading or writing.
#[cfg(feature = "std")]
pub fn open_file(
    filename: &str,
    mode: OpenMode,
) -> Result<crate::stream::FileStream, ImageError> {
    let path = std::path::Path::new(filename);
    match mode {
        OpenMode::In => crate::stream::FileStream::open(path),
        OpenMode::Out => crate::stream::FileStream::create(path),
    }
}

/// Create an empty, growable memory stream with at least `capacity` bytes
/// of initial backing storage.
pub fn create_memory_stream(capacity: usize) -> MemoryStream {
    MemoryStream::with_capacity(capacity)
}

/// Create a memory stream pre-populated with `bytes`, positioned at 0.
pub fn create_memory_stream_from(bytes: Vec<u8>) -> MemoryStream {
    MemoryStream::from_vec(bytes)
}

/// Construct an image directly, optionally from existing pixel bytes and
/// a palette, bypassing any codec.
pub fn create_image(
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Option<Vec<u8>>,
    palette: Option<Palette>,
) -> Result<Image, ImageError> {
    match pixels {
        Some(bytes) => Image::from_parts(width, height, format, bytes, palette),
        None => Image::new(width, height, format, &Limits::default()),
    }
}

/// On-disk image container format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Unknown,
    /// Try to determine the format from content (read) or filename
    /// extension (write).
    AutoDetect,
    Bmp,
    Png,
    Jpeg,
}

const EXTENSIONS: &[(&str, FileFormat)] = &[
    ("bmp", FileFormat::Bmp),
    ("dib", FileFormat::Bmp),
    ("png", FileFormat::Png),
    ("jpg", FileFormat::Jpeg),
    ("jpeg", FileFormat::Jpeg),
    ("jpe", FileFormat::Jpeg),
    ("jfif", FileFormat::Jpeg),
];

/// Map a filename's extension (case-sensitive, text after the last `.`) to
/// a [`FileFormat`]. Returns [`FileFormat::Unknown`] if there is no
/// extension or it isn't recognized.
pub fn file_format_from_extension(filename: &str) -> FileFormat {
    match filename.rsplit_once('.') {
        Some((_, ext)) => EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, f)| *f)
            .unwrap_or(FileFormat::Unknown),
        None => FileFormat::Unknown,
    }
}

fn decode_with(
    format: FileFormat,
    stream: &mut dyn Stream,
    limits: &Limits,
) -> Result<Image, ImageError> {
    match format {
        #[cfg(feature = "bmp")]
        FileFormat::Bmp => crate::bmp::decode(stream, limits),
        #[cfg(feature = "png")]
        FileFormat::Png => crate::png::decode(stream, limits),
        #[cfg(feature = "jpeg")]
        FileFormat::Jpeg => crate::jpeg::decode(stream, limits),
        FileFormat::Unknown | FileFormat::AutoDetect => Err(ImageError::UnrecognizedFormat),
        #[allow(unreachable_patterns)]
        _ => Err(ImageError::UnrecognizedFormat),
    }
}

/// Try each known format in a fixed order, rewinding and clearing sticky
/// stream errors between attempts.
fn auto_detect_read(stream: &mut dyn Stream, limits: &Limits) -> Result<Image, ImageError> {
    let start = stream.tell();
    for format in [FileFormat::Bmp, FileFormat::Png, FileFormat::Jpeg] {
        stream.seek(start as i64, Whence::Begin);
        stream.clear_err();
        match decode_with(format, stream, limits) {
            Ok(image) => return Ok(image),
            Err(_) => continue,
        }
    }
    Err(ImageError::UnrecognizedFormat)
}

/// Read an image from `stream`. With [`FileFormat::AutoDetect`], probes
/// BMP, then PNG, then JPEG, in that order. With a concrete format, decode
/// errors propagate directly (no fallback probing).
///
/// If `target` is `Some`, the decoded image is converted to it when the
/// formats differ.
pub fn read_image(
    stream: &mut dyn Stream,
    format: FileFormat,
    target: Option<PixelFormat>,
    limits: &Limits,
) -> Result<Image, ImageError> {
    let image = match format {
        FileFormat::AutoDetect => auto_detect_read(stream, limits)?,
        other => decode_with(other, stream, limits)?,
    };
    match target {
        Some(pf) if pf != image.format() => image.convert(pf),
        _ => Ok(image),
    }
}

/// Read an image from a named file. With [`FileFormat::AutoDetect`], the
/// filename extension is consulted first; if it doesn't map to a known
/// format, falls back to content probing.
#[cfg(feature = "std")]
pub fn read_image_file(
    filename: &str,
    format: FileFormat,
    target: Option<PixelFormat>,
    limits: &Limits,
) -> Result<Image, ImageError> {
    let mut stream = crate::stream::FileStream::open(std::path::Path::new(filename))?;
    let effective = if format == FileFormat::AutoDetect {
        let by_ext = file_format_from_extension(filename);
        if by_ext == FileFormat::Unknown {
            FileFormat::AutoDetect
        } else {
            by_ext
        }
    } else {
        format
    };
    read_image(&mut stream, effective, target, limits)
}

fn encode_with(
    image: &Image,
    format: FileFormat,
    stream: &mut dyn Stream,
) -> Result<(), ImageError> {
    match format {
        #[cfg(feature = "bmp")]
        FileFormat::Bmp => crate::bmp::encode(image, stream),
        #[cfg(feature = "png")]
        FileFormat::Png => crate::png::encode(image, stream),
        #[cfg(feature = "jpeg")]
        FileFormat::Jpeg => crate::jpeg::encode(image, stream, 90),
        FileFormat::Unknown | FileFormat::AutoDetect => Err(ImageError::UnrecognizedFormat),
        #[allow(unreachable_patterns)]
        _ => Err(ImageError::UnrecognizedFormat),
    }
}

/// Write `image` to `stream` as `format`. `format` must be concrete;
/// [`FileFormat::AutoDetect`] and [`FileFormat::Unknown`] always fail —
/// there is no content to probe when writing.
pub fn write_image(
    image: &Image,
    format: FileFormat,
    stream: &mut dyn Stream,
) -> Result<(), ImageError> {
    encode_with(image, format, stream)
}

/// Write `image` to a named file. With [`FileFormat::AutoDetect`], the
/// format is taken from the filename extension; an unrecognized extension
/// fails outright (unlike reading, writing never falls back to probing).
#[cfg(feature = "std")]
pub fn write_image_file(
    image: &Image,
    filename: &str,
    format: FileFormat,
) -> Result<(), ImageError> {
    let effective = if format == FileFormat::AutoDetect {
        file_format_from_extension(filename)
    } else {
        format
    };
    if matches!(effective, FileFormat::Unknown | FileFormat::AutoDetect) {
        return Err(ImageError::UnrecognizedFormat);
    }
    let mut stream = crate::stream::FileStream::create(std::path::Path::new(filename))?;
    encode_with(image, effective, &mut stream)?;
    stream.flush()
}
