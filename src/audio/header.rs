//! Canonical RIFF/WAVE header layout

use std::fmt;

use crate::audio::cursor::ByteReader;
use crate::error::WaveError;

/// Byte length of the canonical header, and so the payload offset.
pub const CANONICAL_HEADER_LEN: usize = 44;

/// Size of the `fmt ` chunk body for plain PCM.
pub const PCM_FMT_CHUNK_SIZE: u32 = 16;

/// `audio_format` value for linear PCM.
pub const PCM_AUDIO_FORMAT: u16 = 1;

/// Four-byte chunk marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const RIFF: FourCc = FourCc(*b"RIFF");
    pub const WAVE: FourCc = FourCc(*b"WAVE");
    pub const FMT: FourCc = FourCc(*b"fmt ");
    pub const DATA: FourCc = FourCc(*b"data");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// Which of the four markers failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Riff,
    Format,
    Fmt,
    Data,
}

impl TagField {
    pub fn name(&self) -> &'static str {
        match self {
            TagField::Riff => "riff",
            TagField::Format => "format",
            TagField::Fmt => "fmt",
            TagField::Data => "data",
        }
    }

    pub fn expected(&self) -> FourCc {
        match self {
            TagField::Riff => FourCc::RIFF,
            TagField::Format => FourCc::WAVE,
            TagField::Fmt => FourCc::FMT,
            TagField::Data => FourCc::DATA,
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata from the first 44 bytes of a canonical file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiffWaveHeader {
    pub riff_tag: FourCc,
    pub chunk_size: u32,
    pub format_tag: FourCc,
    pub fmt_tag: FourCc,
    pub fmt_chunk_size: u32,
    pub audio_format: u16,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_tag: FourCc,
    pub data_size: u32,
}

impl RiffWaveHeader {
    /// Read every field in file order. Leaves the reader at the payload.
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self, WaveError> {
        Ok(Self {
            riff_tag: reader.read_fourcc()?,
            chunk_size: reader.read_u32le()?,
            format_tag: reader.read_fourcc()?,
            fmt_tag: reader.read_fourcc()?,
            fmt_chunk_size: reader.read_u32le()?,
            audio_format: reader.read_u16le()?,
            channel_count: reader.read_u16le()?,
            sample_rate: reader.read_u32le()?,
            byte_rate: reader.read_u32le()?,
            block_align: reader.read_u16le()?,
            bits_per_sample: reader.read_u16le()?,
            data_tag: reader.read_fourcc()?,
            data_size: reader.read_u32le()?,
        })
    }

    /// Check the four markers in file order.
    pub fn validate_tags(&self) -> Result<(), WaveError> {
        let tags = [
            (TagField::Riff, self.riff_tag),
            (TagField::Format, self.format_tag),
            (TagField::Fmt, self.fmt_tag),
            (TagField::Data, self.data_tag),
        ];
        for (field, actual) in tags {
            if actual != field.expected() {
                return Err(WaveError::InvalidTag { field, expected: field.expected(), actual });
            }
        }
        Ok(())
    }

    /// `block_align / channel_count`, rejecting zero or uneven frames.
    pub fn bytes_per_sample(&self) -> Result<u16, WaveError> {
        if self.channel_count == 0 {
            return Err(WaveError::InvalidChannelCount { channel_count: 0 });
        }
        if self.block_align == 0 || self.block_align % self.channel_count != 0 {
            return Err(WaveError::InvalidBlockAlign {
                block_align: self.block_align,
                channel_count: self.channel_count,
            });
        }
        Ok(self.block_align / self.channel_count)
    }

    /// Inconsistencies that do not stop decoding.
    pub fn soft_warnings(&self, file_len: usize) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.audio_format != PCM_AUDIO_FORMAT {
            warnings.push(format!("audio format {} is not linear PCM", self.audio_format));
        }
        if self.fmt_chunk_size != PCM_FMT_CHUNK_SIZE {
            warnings.push(format!("fmt chunk size is {}, expected {}", self.fmt_chunk_size, PCM_FMT_CHUNK_SIZE));
        }
        if self.sample_rate == 0 {
            warnings.push("sample rate is 0".to_string());
        }
        let expected_byte_rate = self.sample_rate as u64 * self.block_align as u64;
        if self.byte_rate as u64 != expected_byte_rate {
            warnings.push(format!("byte rate is {}, expected {}", self.byte_rate, expected_byte_rate));
        }
        if self.channel_count > 0 && self.bits_per_sample / 8 != self.block_align / self.channel_count {
            warnings.push(format!(
                "{} bits per sample disagrees with block align {} over {} channel(s)",
                self.bits_per_sample, self.block_align, self.channel_count
            ));
        }
        let expected_chunk_size = file_len.saturating_sub(8);
        if self.chunk_size as usize != expected_chunk_size {
            warnings.push(format!("RIFF chunk size is {}, expected {}", self.chunk_size, expected_chunk_size));
        }

        warnings
    }
}

impl fmt::Display for RiffWaveHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RIFF tag: {}", self.riff_tag)?;
        writeln!(f, "Chunk size: {}", self.chunk_size)?;
        writeln!(f, "Format tag: {}", self.format_tag)?;
        writeln!(f, "Fmt tag: {}", self.fmt_tag)?;
        writeln!(f, "Fmt chunk size: {}", self.fmt_chunk_size)?;
        writeln!(f, "Audio format: {}", self.audio_format)?;
        writeln!(f, "Channels: {}", self.channel_count)?;
        writeln!(f, "Sample rate: {}", self.sample_rate)?;
        writeln!(f, "Byte rate: {}", self.byte_rate)?;
        writeln!(f, "Block align: {}", self.block_align)?;
        writeln!(f, "Bits per sample: {}", self.bits_per_sample)?;
        writeln!(f, "Data tag: {}", self.data_tag)?;
        write!(f, "Data size: {}", self.data_size)
    }
}
