use alloc::string::String;

use crate::format::PixelFormat;

/// Errors from image decoding, encoding, and stream I/O.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: usize, actual: usize },

    #[error("seek failure: {0}")]
    SeekFailure(String),

    #[error("decoder error: {0}")]
    DecoderInternal(String),

    #[error("unsupported conversion: {from:?} -> {to:?}")]
    UnsupportedConversion { from: PixelFormat, to: PixelFormat },

    #[error("resource limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unrecognized file format")]
    UnrecognizedFormat,

    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "png")]
impl From<png::DecodingError> for ImageError {
    fn from(e: png::DecodingError) -> Self {
        ImageError::DecoderInternal(alloc::format!("png: {e}"))
    }
}

#[cfg(feature = "png")]
impl From<png::EncodingError> for ImageError {
    fn from(e: png::EncodingError) -> Self {
        ImageError::DecoderInternal(alloc::format!("png: {e}"))
    }
}

#[cfg(feature = "jpeg")]
impl From<jpeg_decoder::Error> for ImageError {
    fn from(e: jpeg_decoder::Error) -> Self {
        ImageError::DecoderInternal(alloc::format!("jpeg: {e}"))
    }
}

#[cfg(feature = "jpeg")]
impl From<jpeg_encoder::EncodingError> for ImageError {
    fn from(e: jpeg_encoder::EncodingError) -> Self {
        ImageError::DecoderInternal(alloc::format!("jpeg: {e}"))
    }
}
