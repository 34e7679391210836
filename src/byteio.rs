//! Typed little-/big-endian reads and writes layered over a [`Stream`].

use crate::error::ImageError;
use crate::stream::Stream;

/// Byte order for [`ByteReader`]/[`ByteWriter`] multi-byte access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// The endianness native to the host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;
}

/// Reads typed values from a [`Stream`], swapping bytes when the selected
/// endianness differs from the host's.
pub struct ByteReader<'s, S: Stream + ?Sized> {
    stream: &'s mut S,
    endian: Endian,
}

impl<'s, S: Stream + ?Sized> ByteReader<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        ByteReader {
            stream,
            endian: Endian::NATIVE,
        }
    }

    pub fn with_endian(stream: &'s mut S, endian: Endian) -> Self {
        ByteReader { stream, endian }
    }

    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn stream_mut(&mut self) -> &mut S {
        self.stream
    }

    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), ImageError> {
        self.stream.read_exact(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8, ImageError> {
        let mut b = [0u8; 1];
        self.stream.read_exact(&mut b)?;
        Ok(b[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ImageError> {
        Ok(self.read_u8()? as i8)
    }
}

macro_rules! read_int {
    ($name:ident, $ty:ty, $n:expr) => {
        impl<'s, S: Stream + ?Sized> ByteReader<'s, S> {
            pub fn $name(&mut self) -> Result<$ty, ImageError> {
                let mut b = [0u8; $n];
                self.stream.read_exact(&mut b)?;
                Ok(match self.endian {
                    Endian::Little => <$ty>::from_le_bytes(b),
                    Endian::Big => <$ty>::from_be_bytes(b),
                })
            }
        }
    };
}

read_int!(read_u16, u16, 2);
read_int!(read_i16, i16, 2);
read_int!(read_u32, u32, 4);
read_int!(read_i32, i32, 4);
read_int!(read_u64, u64, 8);
read_int!(read_i64, i64, 8);
read_int!(read_f32, f32, 4);
read_int!(read_f64, f64, 8);

/// Writes typed values to a [`Stream`], swapping bytes when the selected
/// endianness differs from the host's.
pub struct ByteWriter<'s, S: Stream + ?Sized> {
    stream: &'s mut S,
    endian: Endian,
}

impl<'s, S: Stream + ?Sized> ByteWriter<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        ByteWriter {
            stream,
            endian: Endian::NATIVE,
        }
    }

    pub fn with_endian(stream: &'s mut S, endian: Endian) -> Self {
        ByteWriter { stream, endian }
    }

    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn stream_mut(&mut self) -> &mut S {
        self.stream
    }

    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ImageError> {
        self.stream.write_all(buf)
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), ImageError> {
        self.stream.write_all(&[v])
    }

    pub fn write_i8(&mut self, v: i8) -> Result<(), ImageError> {
        self.write_u8(v as u8)
    }
}

macro_rules! write_int {
    ($name:ident, $ty:ty) => {
        impl<'s, S: Stream + ?Sized> ByteWriter<'s, S> {
            pub fn $name(&mut self, v: $ty) -> Result<(), ImageError> {
                let bytes = match self.endian {
                    Endian::Little => v.to_le_bytes(),
                    Endian::Big => v.to_be_bytes(),
                };
                self.stream.write_all(&bytes)
            }
        }
    };
}

write_int!(write_u16, u16);
write_int!(write_i16, i16);
write_int!(write_u32, u32);
write_int!(write_i32, i32);
write_int!(write_u64, u64);
write_int!(write_i64, i64);
write_int!(write_f32, f32);
write_int!(write_f64, f64);
