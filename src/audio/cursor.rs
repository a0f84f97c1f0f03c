//! Sequential little-endian reader over an immutable byte buffer

use crate::audio::header::FourCc;
use crate::error::WaveError;

/// Cursor over a borrowed buffer. Every read advances `position` by exactly
/// the number of bytes it consumed.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Start reading at `position` instead of the beginning. A position past
    /// the end is clamped to the buffer length.
    pub fn at(buf: &'a [u8], position: usize) -> Self {
        Self { buf, position: position.min(buf.len()) }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.buf.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], WaveError> {
        if self.remaining() < len {
            return Err(WaveError::OutOfBounds {
                offset: self.position,
                requested: len,
                available: self.buf.len(),
            });
        }
        let bytes = &self.buf[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    pub fn read_u16le(&mut self) -> Result<u16, WaveError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32le(&mut self) -> Result<u32, WaveError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Raw tag bytes, compared byte for byte by the caller.
    pub fn read_tag(&mut self, len: usize) -> Result<&'a [u8], WaveError> {
        self.take(len)
    }

    pub fn read_fourcc(&mut self) -> Result<FourCc, WaveError> {
        let b = self.take(4)?;
        Ok(FourCc([b[0], b[1], b[2], b[3]]))
    }

    /// Lenient sample read: up to `bytes_per_sample` (at most 4) bytes,
    /// little-endian. Bytes past the end of the buffer read as zero and the
    /// cursor only moves over bytes that exist. Never fails.
    pub fn read_sample_group(&mut self, bytes_per_sample: usize) -> u32 {
        let width = bytes_per_sample.min(4);
        let available = width.min(self.remaining());
        let mut value = 0u32;
        for (i, &byte) in self.buf[self.position..self.position + available].iter().enumerate() {
            value |= (byte as u32) << (8 * i);
        }
        self.position += available;
        value
    }
}
