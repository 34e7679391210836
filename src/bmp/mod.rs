//! BMP codec: BITMAPFILEHEADER + BITMAPINFOHEADER (v3, 40-byte) only.
//!
//! Reads 1/4/8/16/24/32 bpp, `BI_RGB` (uncompressed) only — no RLE4/RLE8,
//! no `BI_BITFIELDS`, no OS/2 headers. Writes 24 bpp only, BGR source.
//!
//! Two header quirks are preserved verbatim because the spec calls for
//! bug-compatibility with the reference implementation rather than a
//! "corrected" reading of the BMP format:
//!
//! - `biHeight > 0` is treated as "rows are already stored top-down" (the
//!   opposite of the usual BMP convention, where a positive height means
//!   bottom-up and calls for a flip). Only a *negative* height is flipped.
//! - 16 bpp pixels are unpacked as 5-5-5 (1 bit padding), not 5-6-5, with
//!   a zero-preserving expansion: a channel only gets its low 3 bits
//!   filled in (`x |= x >> 5`) if the top 5 bits were nonzero.
//!
//! the `write` path always emits a positive (bottom-up) height, matching
//! the vast majority of BMP writers in the wild.

mod decode;
mod encode;
mod utils;

pub use decode::decode;
pub use encode::encode;
