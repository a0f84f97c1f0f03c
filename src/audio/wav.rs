//! Canonical WAVE decoding

use std::fmt;
use std::path::Path;

use ndarray::Array2;

use crate::audio::cursor::ByteReader;
use crate::audio::header::{RiffWaveHeader, CANONICAL_HEADER_LEN};
use crate::error::{Result, WaveError, WavescopeError};
use crate::playback::PlaybackRequest;
use crate::raster::Raster;

/// A decoded canonical WAVE file. Owns the original bytes alongside the
/// per-channel samples and is never modified after `decode` returns.
#[derive(Debug, Clone)]
pub struct DecodedWave {
    buffer: Vec<u8>,
    header: RiffWaveHeader,
    data_offset: usize,
    bytes_per_sample: usize,
    sample_count_per_channel: usize,
    channels: Vec<Vec<u32>>,
}

impl DecodedWave {
    /// Decode a whole file held in memory.
    ///
    /// Either every check passes and the full structure is returned, or the
    /// first failing check is reported and nothing is kept.
    pub fn decode(buffer: impl Into<Vec<u8>>) -> std::result::Result<Self, WaveError> {
        let buffer = buffer.into();

        if buffer.len() < CANONICAL_HEADER_LEN {
            return Err(WaveError::TruncatedHeader {
                required: CANONICAL_HEADER_LEN,
                actual: buffer.len(),
            });
        }

        let mut reader = ByteReader::new(&buffer);
        let header = RiffWaveHeader::parse(&mut reader)?;
        let data_offset = reader.position();

        header.validate_tags()?;

        if header.channel_count == 0 {
            return Err(WaveError::InvalidChannelCount { channel_count: header.channel_count });
        }

        let payload_len = buffer.len() - data_offset;
        if payload_len != header.data_size as usize {
            return Err(WaveError::DataSizeMismatch {
                expected: header.data_size as usize,
                actual: payload_len,
            });
        }

        let bytes_per_sample = header.bytes_per_sample()?;
        if bytes_per_sample > 4 {
            return Err(WaveError::UnsupportedSampleWidth { bytes_per_sample });
        }
        let bytes_per_sample = bytes_per_sample as usize;

        for warning in header.soft_warnings(buffer.len()) {
            log::warn!("{}", warning);
        }

        let expected_samples = header.data_size as usize / header.block_align as usize;
        let channel_count = header.channel_count as usize;

        // Frames are interleaved ch0, ch1, ..., ch0, ch1, ...
        let mut channels: Vec<Vec<u32>> = (0..channel_count)
            .map(|_| Vec::with_capacity(expected_samples))
            .collect();
        while !reader.is_at_end() {
            for channel in channels.iter_mut() {
                channel.push(reader.read_sample_group(bytes_per_sample));
            }
        }

        let decoded = channels[0].len();
        if decoded != expected_samples {
            return Err(WaveError::SampleCountMismatch { expected: expected_samples, actual: decoded });
        }

        log::debug!("Header:\n{}", header);
        log::debug!(
            "Decoded {} channel(s) x {} samples, {} bytes per sample",
            channel_count, expected_samples, bytes_per_sample
        );

        Ok(Self {
            buffer,
            header,
            data_offset,
            bytes_per_sample,
            sample_count_per_channel: expected_samples,
            channels,
        })
    }

    /// Load a file fully into memory, then decode it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let buffer = std::fs::read(path)
            .map_err(|e| WavescopeError::io(format!("Cannot read audio file {}: {}", path.display(), e)))?;
        log::info!("Read {} bytes from {}", buffer.len(), path.display());

        Ok(Self::decode(buffer)?)
    }

    pub fn header(&self) -> &RiffWaveHeader {
        &self.header
    }

    /// The whole file, header included.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn data_offset(&self) -> usize {
        self.data_offset
    }

    /// Interleaved sample bytes exactly as stored in the file.
    pub fn payload(&self) -> &[u8] {
        &self.buffer[self.data_offset..]
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.bytes_per_sample
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.header.channel_count
    }

    pub fn sample_count_per_channel(&self) -> usize {
        self.sample_count_per_channel
    }

    pub fn channels(&self) -> &[Vec<u32>] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&[u32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Play time in seconds. Zero when the header declares a zero rate.
    pub fn duration_seconds(&self) -> f64 {
        if self.header.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count_per_channel as f64 / self.header.sample_rate as f64
    }

    /// Whole-second duration scaled by channel count, kept for output parity
    /// with older tooling that reported this figure.
    pub fn legacy_duration(&self) -> u64 {
        if self.header.sample_rate == 0 {
            return 0;
        }
        (self.sample_count_per_channel as u64 / self.header.sample_rate as u64)
            * self.header.channel_count as u64
    }

    /// Samples as a `frames x channels` matrix.
    pub fn frames(&self) -> Array2<u32> {
        Array2::from_shape_fn(
            (self.sample_count_per_channel, self.channels.len()),
            |(frame, channel)| self.channels[channel][frame],
        )
    }

    /// Rebuild interleaved payload bytes from the channel sequences.
    pub fn interleave(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.sample_count_per_channel * self.header.block_align as usize);
        for frame in self.frames().rows() {
            for &sample in frame.iter() {
                out.extend_from_slice(&sample.to_le_bytes()[..self.bytes_per_sample]);
            }
        }
        out
    }

    pub fn playback_request(&self) -> PlaybackRequest<'_> {
        PlaybackRequest {
            sample_rate: self.header.sample_rate,
            channel_count: self.header.channel_count,
            bits_per_sample: self.header.bits_per_sample,
            payload: self.payload(),
            frame_count: self.sample_count_per_channel as u32,
        }
    }

    pub fn raster(&self) -> Raster {
        Raster::from_bytes(&self.buffer, self.data_offset)
    }
}

impl TryFrom<Vec<u8>> for DecodedWave {
    type Error = WaveError;

    fn try_from(buffer: Vec<u8>) -> std::result::Result<Self, Self::Error> {
        Self::decode(buffer)
    }
}

impl fmt::Display for DecodedWave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} channel(s), {} samples per channel, {:.3}s",
            self.channels.len(),
            self.sample_count_per_channel,
            self.duration_seconds()
        )
    }
}

/// Build a canonical 44-byte-header file around `payload`. Derived fields
/// (`byte_rate`, `block_align`, sizes) are filled in consistently.
pub fn canonical_wav_bytes(channel_count: u16, sample_rate: u32, bits_per_sample: u16, payload: &[u8]) -> Vec<u8> {
    let block_align = channel_count * (bits_per_sample / 8);
    let data_size = payload.len() as u32;

    let mut bytes = Vec::with_capacity(CANONICAL_HEADER_LEN + payload.len());
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&channel_count.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits_per_sample.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}
