//! Audio Decoding Module
//!
//! Byte-level reading and validation of canonical PCM WAVE files.

pub mod cursor;
pub mod header;
pub mod wav;

pub use cursor::ByteReader;
pub use header::{FourCc, RiffWaveHeader, TagField, CANONICAL_HEADER_LEN};
pub use wav::{canonical_wav_bytes, DecodedWave};
