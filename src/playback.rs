//! Audio playback of decoded files through an output device

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::error::{Result, WavescopeError};

/// Everything an output device needs: format plus the interleaved payload
/// straight from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackRequest<'a> {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub bits_per_sample: u16,
    pub payload: &'a [u8],
    pub frame_count: u32,
}

impl PlaybackRequest<'_> {
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frame_count as f64 / self.sample_rate as f64)
    }

    /// Convert the payload to signed 16-bit samples, still interleaved.
    ///
    /// 8-bit WAVE data is unsigned and gets re-centred; wider samples keep
    /// their top 16 bits.
    pub fn to_i16_samples(&self) -> Result<Vec<i16>> {
        let width = match self.bits_per_sample {
            8 => 1,
            16 => 2,
            24 => 3,
            32 => 4,
            other => {
                return Err(WavescopeError::playback(format!("Unsupported bit depth for playback: {}", other)));
            }
        };

        let sample_total = self.frame_count as usize * self.channel_count as usize;
        let samples = self
            .payload
            .chunks_exact(width)
            .take(sample_total)
            .map(|b| match width {
                1 => ((b[0] as i16) - 128) << 8,
                2 => i16::from_le_bytes([b[0], b[1]]),
                3 => i16::from_le_bytes([b[1], b[2]]),
                _ => i16::from_le_bytes([b[2], b[3]]),
            })
            .collect();

        Ok(samples)
    }
}

/// Something that can render a [`PlaybackRequest`].
pub trait PlaybackSink {
    fn play(&mut self, request: &PlaybackRequest<'_>) -> Result<()>;
}

/// Plays through a `cpal` output device, blocking until the last frame has
/// been handed to the device.
pub struct CpalSink {
    device_name: Option<String>,
    drain_margin: Duration,
}

impl CpalSink {
    pub fn new(device_name: Option<String>) -> Self {
        Self {
            device_name,
            drain_margin: Duration::from_millis(500),
        }
    }

    pub fn with_drain_margin(mut self, margin: Duration) -> Self {
        self.drain_margin = margin;
        self
    }

    fn open_device(&self) -> Result<cpal::Device> {
        let host = cpal::default_host();

        match &self.device_name {
            None => host
                .default_output_device()
                .ok_or_else(|| WavescopeError::playback("No default output device available")),
            Some(name) => {
                let mut devices = host
                    .output_devices()
                    .map_err(|e| WavescopeError::playback(format!("Cannot enumerate output devices: {}", e)))?;
                devices
                    .find(|d| d.name().map(|n| n == *name).unwrap_or(false))
                    .ok_or_else(|| WavescopeError::playback(format!("Output device not found: {}", name)))
            }
        }
    }
}

impl PlaybackSink for CpalSink {
    fn play(&mut self, request: &PlaybackRequest<'_>) -> Result<()> {
        if request.sample_rate == 0 || request.channel_count == 0 {
            return Err(WavescopeError::playback("Cannot play audio with zero sample rate or channels"));
        }

        let samples = request.to_i16_samples()?;
        if samples.is_empty() {
            log::info!("Nothing to play");
            return Ok(());
        }

        let device = self.open_device()?;
        log::info!(
            "Playing {} frames on '{}' ({} Hz, {} channel(s))",
            request.frame_count,
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            request.sample_rate,
            request.channel_count
        );

        let config = cpal::StreamConfig {
            channels: request.channel_count,
            sample_rate: cpal::SampleRate(request.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (done_tx, done_rx) = mpsc::channel();
        let mut done_tx = Some(done_tx);
        let mut position = 0usize;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    for out in data.iter_mut() {
                        *out = match samples.get(position) {
                            Some(&s) => {
                                position += 1;
                                s
                            }
                            None => 0,
                        };
                    }
                    if position >= samples.len() {
                        if let Some(tx) = done_tx.take() {
                            let _ = tx.send(());
                        }
                    }
                },
                |err| log::error!("Output stream error: {}", err),
                None,
            )
            .map_err(|e| WavescopeError::playback(format!("Cannot build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| WavescopeError::playback(format!("Cannot start output stream: {}", e)))?;

        match done_rx.recv_timeout(request.duration() + self.drain_margin) {
            Ok(()) => log::debug!("All frames submitted"),
            Err(RecvTimeoutError::Timeout) => log::warn!("Playback did not finish in time, stopping"),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(WavescopeError::playback("Output stream closed before playback finished"));
            }
        }

        // last period still has to leave the device
        std::thread::sleep(self.drain_margin);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        played: Vec<(u32, u16, usize)>,
    }

    impl PlaybackSink for RecordingSink {
        fn play(&mut self, request: &PlaybackRequest<'_>) -> Result<()> {
            self.played.push((request.sample_rate, request.channel_count, request.to_i16_samples()?.len()));
            Ok(())
        }
    }

    fn request(bits: u16, payload: &[u8], frames: u32) -> PlaybackRequest<'_> {
        PlaybackRequest {
            sample_rate: 8000,
            channel_count: 1,
            bits_per_sample: bits,
            payload,
            frame_count: frames,
        }
    }

    #[test]
    fn test_convert_8bit_unsigned() {
        let samples = request(8, &[0, 128, 255], 3).to_i16_samples().unwrap();
        assert_eq!(samples, vec![-32768, 0, 127 << 8]);
    }

    #[test]
    fn test_convert_16bit() {
        let samples = request(16, &[0x34, 0x12, 0xff, 0xff], 2).to_i16_samples().unwrap();
        assert_eq!(samples, vec![0x1234, -1]);
    }

    #[test]
    fn test_convert_wide_keeps_high_bits() {
        let samples = request(24, &[0xaa, 0x34, 0x12], 1).to_i16_samples().unwrap();
        assert_eq!(samples, vec![0x1234]);

        let samples = request(32, &[0xaa, 0xbb, 0x00, 0x80], 1).to_i16_samples().unwrap();
        assert_eq!(samples, vec![i16::MIN]);
    }

    #[test]
    fn test_convert_respects_frame_count() {
        let samples = request(8, &[1, 2, 3, 4], 2).to_i16_samples().unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_unsupported_depth() {
        let err = request(12, &[0, 0], 1).to_i16_samples().unwrap_err();
        assert!(matches!(err, WavescopeError::Playback { .. }));
    }

    #[test]
    fn test_duration() {
        assert_eq!(request(8, &[], 4000).duration(), Duration::from_millis(500));
        let mut silent = request(8, &[], 4000);
        silent.sample_rate = 0;
        assert_eq!(silent.duration(), Duration::ZERO);
    }

    #[test]
    fn test_sink_receives_request() {
        let payload = [0u8; 8];
        let mut sink = RecordingSink { played: Vec::new() };
        sink.play(&request(16, &payload, 4)).unwrap();
        assert_eq!(sink.played, vec![(8000, 1, 4)]);
    }

    #[test]
    fn test_cpal_sink_rejects_zero_rate() {
        let mut req = request(16, &[0, 0], 1);
        req.sample_rate = 0;
        let err = CpalSink::new(None).play(&req).unwrap_err();
        assert!(matches!(err, WavescopeError::Playback { .. }));
    }
}
