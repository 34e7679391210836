//! Stream abstraction: a byte-addressable, seekable I/O sink with sticky
//! error state, backed either by a file or by an owned memory buffer.

use alloc::vec::Vec;

use crate::error::ImageError;

/// Origin for a [`Stream::seek`] offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Whence {
    Begin,
    Current,
    End,
}

/// A seekable byte stream with sticky `eof`/`bad` flags.
///
/// Once `bad` is set it stays set until [`Stream::clear_err`] is called;
/// `good()` is `!eof() && !bad()`. This mirrors C `FILE*`/iostream semantics
/// rather than Rust's usual `Result`-per-call convention, since the codecs
/// in this crate are transliterated against that model.
pub trait Stream {
    /// Read up to `buf.len()` bytes. Returns the number of bytes actually
    /// read, which may be less than `buf.len()` at end of stream. Sets
    /// `eof` once a read returns fewer bytes than requested because the
    /// stream is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Write all of `buf`. Sets `bad` and returns fewer bytes than
    /// `buf.len()` if the underlying sink rejects the write.
    fn write(&mut self, buf: &[u8]) -> usize;

    /// Reposition the stream. Returns the new absolute position, or sets
    /// `bad` and returns the pre-seek position if `offset`/`whence` would
    /// move outside the stream's valid range.
    fn seek(&mut self, offset: i64, whence: Whence) -> u64;

    /// Current absolute position.
    fn tell(&self) -> u64;

    fn eof(&self) -> bool;
    fn bad(&self) -> bool;
    fn good(&self) -> bool {
        !self.eof() && !self.bad()
    }
    fn clear_err(&mut self);

    /// Flush any buffered writes. A no-op for in-memory streams.
    fn flush(&mut self) -> Result<(), ImageError>;

    /// Read exactly `buf.len()` bytes or fail with [`ImageError::ShortRead`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ImageError> {
        let n = self.read(buf);
        if n != buf.len() {
            return Err(ImageError::ShortRead {
                expected: buf.len(),
                actual: n,
            });
        }
        Ok(())
    }

    /// Write exactly `buf.len()` bytes or fail with [`ImageError::ShortWrite`].
    fn write_all(&mut self, buf: &[u8]) -> Result<(), ImageError> {
        let n = self.write(buf);
        if n != buf.len() {
            return Err(ImageError::ShortWrite {
                expected: buf.len(),
                actual: n,
            });
        }
        Ok(())
    }
}

/// An in-memory, growable stream.
///
/// Capacity grows to the next power of two whenever a write would overrun
/// it. Shrinking the logical size (via a seek-then-truncate pattern) never
/// releases capacity; only the size bookkeeping changes.
#[derive(Debug, Default)]
pub struct MemoryStream {
    buf: Vec<u8>,
    size: usize,
    pos: usize,
    eof: bool,
    bad: bool,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStream {
            buf: Vec::with_capacity(capacity),
            size: 0,
            pos: 0,
            eof: false,
            bad: false,
        }
    }

    /// Take ownership of an existing buffer as the stream's initial content.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let size = data.len();
        MemoryStream {
            buf: data,
            size,
            pos: 0,
            eof: false,
            bad: false,
        }
    }

    /// Logical length of the stream's contents (not the backing capacity).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Borrow the valid (logical) portion of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.size]
    }

    /// Consume the stream, returning the valid portion as an owned buffer.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.size);
        self.buf
    }

    fn ensure_capacity(&mut self, needed: usize) {
        if needed <= self.buf.capacity() {
            return;
        }
        let mut cap = self.buf.capacity().max(1);
        while cap < needed {
            cap <<= 1;
        }
        self.buf.reserve(cap - self.buf.len());
    }

    /// Shrink (or grow) the logical size in place. Growing zero-fills the
    /// new region; shrinking keeps the backing capacity untouched.
    pub fn resize(&mut self, new_size: usize) {
        self.ensure_capacity(new_size);
        if new_size > self.buf.len() {
            self.buf.resize(new_size, 0);
        }
        self.size = new_size;
        if self.pos > self.size {
            self.pos = self.size;
        }
    }
}

impl Stream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let avail = self.size.saturating_sub(self.pos);
        let n = buf.len().min(avail);
        buf[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        if n < buf.len() {
            self.eof = true;
        }
        n
    }

    fn write(&mut self, buf: &[u8]) -> usize {
        let end = self.pos + buf.len();
        self.ensure_capacity(end);
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        if end > self.size {
            self.size = end;
        }
        buf.len()
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> u64 {
        let base: i64 = match whence {
            Whence::Begin => 0,
            Whence::Current => self.pos as i64,
            Whence::End => self.size as i64,
        };
        let target = base + offset;
        if target < 0 || target as u64 > self.size as u64 {
            self.bad = true;
            return self.pos as u64;
        }
        self.pos = target as usize;
        self.eof = false;
        self.pos as u64
    }

    fn tell(&self) -> u64 {
        self.pos as u64
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn bad(&self) -> bool {
        self.bad
    }

    fn clear_err(&mut self) {
        self.eof = false;
        self.bad = false;
    }

    fn flush(&mut self) -> Result<(), ImageError> {
        Ok(())
    }
}

/// A stream backed by an open [`std::fs::File`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct FileStream {
    file: std::fs::File,
    eof: bool,
    bad: bool,
}

#[cfg(feature = "std")]
impl FileStream {
    pub fn new(file: std::fs::File) -> Self {
        FileStream {
            file,
            eof: false,
            bad: false,
        }
    }

    pub fn open(path: &std::path::Path) -> Result<Self, ImageError> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(file))
    }

    pub fn create(path: &std::path::Path) -> Result<Self, ImageError> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(file))
    }
}

#[cfg(feature = "std")]
impl Stream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        use std::io::Read;
        let mut total = 0;
        while total < buf.len() {
            match self.file.read(&mut buf[total..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(n) => total += n,
                Err(_) => {
                    self.bad = true;
                    break;
                }
            }
        }
        total
    }

    fn write(&mut self, buf: &[u8]) -> usize {
        use std::io::Write;
        match self.file.write_all(buf) {
            Ok(()) => buf.len(),
            Err(_) => {
                self.bad = true;
                0
            }
        }
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> u64 {
        use std::io::{Seek, SeekFrom};
        let from = match whence {
            Whence::Begin => SeekFrom::Start(offset as u64),
            Whence::Current => SeekFrom::Current(offset),
            Whence::End => SeekFrom::End(offset),
        };
        match self.file.seek(from) {
            Ok(pos) => {
                self.eof = false;
                pos
            }
            Err(_) => {
                self.bad = true;
                self.file.stream_position().unwrap_or(0)
            }
        }
    }

    fn tell(&self) -> u64 {
        use std::io::Seek;
        let mut file = &self.file;
        file.stream_position().unwrap_or(0)
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn bad(&self) -> bool {
        self.bad
    }

    fn clear_err(&mut self) {
        self.eof = false;
        self.bad = false;
    }

    fn flush(&mut self) -> Result<(), ImageError> {
        use std::io::Write;
        self.file.flush()?;
        Ok(())
    }
}
