//! # zenimage
//!
//! BMP, PNG, and JPEG image codec with a unified pixel-format model and an
//! octree color quantizer.
//!
//! ## Supported formats
//!
//! - **BMP** (`bmp` feature, on by default) — `BI_RGB` only, 1/4/8/16/24/32
//!   bpp read, 24 bpp write. Preserves two header quirks bit-for-bit rather
//!   than "fixing" them: an inverted height-sign convention, and 5-5-5
//!   (not 5-6-5) 16 bpp channel packing. See [`bmp`].
//! - **PNG** (`png` feature) — via the [`png`] crate. Grayscale and
//!   indexed color expand to RGB(A); 16-bit channels strip to 8-bit.
//! - **JPEG** (`jpeg` feature) — via `jpeg-decoder`/`jpeg-encoder`. RGB
//!   only; JPEG has no alpha channel.
//!
//! ## Usage
//!
//! ```no_run
//! use zenimage::{FileFormat, MemoryStream, Limits, read_image};
//!
//! let bytes = std::fs::read("photo.png")?;
//! let mut stream = MemoryStream::from_vec(bytes);
//! let image = read_image(&mut stream, FileFormat::AutoDetect, None, &Limits::default())?;
//! println!("{}x{} {:?}", image.width(), image.height(), image.format());
//! # Ok::<(), zenimage::ImageError>(())
//! ```
//!
//! ## Credits
//!
//! - BMP bit-expansion helpers forked from [zune-bmp](https://github.com/etemesi254/zune-image) 0.5.2
//!   by Caleb Etemesi (MIT/Apache-2.0/Zlib)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod byteio;
mod error;
mod facade;
mod format;
mod image;
mod limits;
mod packed;
mod quantize;
mod stream;

#[cfg(feature = "bmp")]
mod bmp;

#[cfg(feature = "png")]
mod png;

#[cfg(feature = "jpeg")]
mod jpeg;

pub use byteio::{ByteReader, ByteWriter, Endian};
pub use error::ImageError;
pub use facade::{
    create_image, create_memory_stream, create_memory_stream_from, file_format_from_extension,
    read_image, write_image, FileFormat, OpenMode,
};
pub use format::{Palette, PixelFormat, PixelFormatDescriptor, RequestedFormat};
pub use image::Image;
pub use limits::Limits;
pub use packed::{convert_pixels, PackedFormat};
pub use quantize::Octree;
pub use stream::{MemoryStream, Stream, Whence};

#[cfg(feature = "std")]
pub use facade::{open_file, read_image_file, write_image_file};

#[cfg(feature = "std")]
pub use stream::FileStream;
