//! Error Types

use thiserror::Error;

use crate::audio::header::{FourCc, TagField};

/// Structural failures while decoding a canonical WAVE buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaveError {
    #[error("Truncated header: need at least {required} bytes, got {actual}")]
    TruncatedHeader { required: usize, actual: usize },

    #[error("Invalid {field} tag: expected {expected}, found {actual}")]
    InvalidTag { field: TagField, expected: FourCc, actual: FourCc },

    #[error("Invalid channel count: {channel_count}")]
    InvalidChannelCount { channel_count: u16 },

    #[error("Invalid block align {block_align} for {channel_count} channel(s)")]
    InvalidBlockAlign { block_align: u16, channel_count: u16 },

    #[error("Unsupported sample width: {bytes_per_sample} bytes (max 4)")]
    UnsupportedSampleWidth { bytes_per_sample: u16 },

    #[error("Data size mismatch: header declares {expected} bytes, file carries {actual}")]
    DataSizeMismatch { expected: usize, actual: usize },

    #[error("Sample count mismatch: expected {expected} samples per channel, decoded {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("Read out of bounds: {requested} bytes at offset {offset}, buffer holds {available}")]
    OutOfBounds { offset: usize, requested: usize, available: usize },
}

/// Main error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WavescopeError {
    #[error("Wave error: {0}")]
    Wave(#[from] WaveError),
    #[error("IO error: {message}")]
    Io { message: String },
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("Playback error: {message}")]
    Playback { message: String },
}

impl WavescopeError {
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn playback<S: Into<String>>(msg: S) -> Self { Self::Playback { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, WavescopeError>;

impl From<std::io::Error> for WavescopeError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}
