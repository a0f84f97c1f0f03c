//! Configuration management

use crate::error::{WavescopeError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub raster: RasterConfig,
    pub processing: ProcessingConfig,
    pub input_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub enabled: bool,
    /// Output device name; the host default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub drain_margin_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Appended to the input file name when no output path is given.
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            raster: RasterConfig::default(),
            processing: ProcessingConfig::default(),
            input_path: PathBuf::from("input.wav"),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            device: None,
            drain_margin_ms: 500,
        }
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_path: None,
            extension: "rgba".to_string(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { verbose: false }
    }
}

impl Config {
    pub fn verbose(&self) -> bool {
        self.processing.verbose
    }

    /// Where the raster dump goes, if rasterizing at all.
    pub fn raster_output_path(&self) -> Option<PathBuf> {
        if !self.raster.enabled {
            return None;
        }
        if let Some(path) = &self.raster.output_path {
            return Some(path.clone());
        }
        let mut name = self.input_path.as_os_str().to_owned();
        name.push(".");
        name.push(&self.raster.extension);
        Some(PathBuf::from(name))
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "wavescope", about = "Canonical WAVE decoder and inspector", version, author)]
pub struct Args {
    #[arg(short = 'i', long = "input", help = "Input audio file path (canonical PCM WAV)")]
    pub input: PathBuf,

    #[arg(short = 'p', long = "play", help = "Play the decoded audio")]
    pub play: bool,

    #[arg(long = "device", help = "Output device name (defaults to the system default)")]
    pub device: Option<String>,

    #[arg(short = 'r', long = "raster", help = "Write the payload as a raw RGBA raster to this path")]
    pub raster: Option<PathBuf>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments
    pub fn from_args() -> Result<Self> {
        let args = Args::parse();
        Self::from_args_and_config(args)
    }

    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        config.input_path = args.input;
        if args.play {
            config.playback.enabled = true;
        }
        if args.device.is_some() {
            config.playback.device = args.device;
        }
        if let Some(raster_path) = args.raster {
            config.raster.enabled = true;
            config.raster.output_path = Some(raster_path);
        }
        config.processing.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WavescopeError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| WavescopeError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        let ext = &self.raster.extension;
        if ext.is_empty() {
            return Err(WavescopeError::config("Raster extension cannot be empty"));
        }
        if ext.contains(['.', '/', '\\']) {
            return Err(WavescopeError::config(format!("Raster extension must be a bare name: {}", ext)));
        }

        if self.playback.drain_margin_ms > 10_000 {
            return Err(WavescopeError::config("Drain margin cannot exceed 10000 ms"));
        }

        if let Some(device) = &self.playback.device {
            if device.trim().is_empty() {
                return Err(WavescopeError::config("Playback device name cannot be blank"));
            }
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| WavescopeError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| WavescopeError::config(format!("Failed to write config file: {}", e)))
    }

    /// Create default config file
    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}
