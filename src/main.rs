//! wavescope - Canonical WAVE Inspector

use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use wavescope::playback::{CpalSink, PlaybackSink};
use wavescope::{init_logging, Args, Config, DecodedWave};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        println!("{}", wavescope::get_library_info());
        println!();
    }

    let config = Config::from_args_and_config(args)?;

    let wave = DecodedWave::from_file(&config.input_path)
        .with_context(|| format!("Failed to decode {}", config.input_path.display()))?;

    println!("=== {} ===", config.input_path.display());
    println!("{}", wave.header());
    println!();
    println!("Decoded: {}", wave);
    if config.verbose() {
        println!("Payload offset: {}", wave.data_offset());
        println!("Bytes per sample: {}", wave.bytes_per_sample());
        println!("Legacy duration: {}", wave.legacy_duration());
    }

    if let Some(raster_path) = config.raster_output_path() {
        let raster = wave.raster();
        raster
            .write_raw(&raster_path)
            .with_context(|| format!("Failed to write raster {}", raster_path.display()))?;
        println!("Raster: {}x{} RGBA -> {}", raster.width(), raster.height(), raster_path.display());
    }

    if config.playback.enabled {
        let mut sink = CpalSink::new(config.playback.device.clone())
            .with_drain_margin(Duration::from_millis(config.playback.drain_margin_ms));
        sink.play(&wave.playback_request()).context("Playback failed")?;
        println!("Playback complete");
    }

    Ok(())
}
