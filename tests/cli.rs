//! Command line behaviour

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wavescope::audio::canonical_wav_bytes;

fn fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_prints_header_and_summary() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "tone.wav", &canonical_wav_bytes(2, 44100, 16, &[0u8; 400]));

    Command::cargo_bin("wavescope")
        .unwrap()
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("RIFF tag: RIFF"))
        .stdout(predicate::str::contains("Channels: 2"))
        .stdout(predicate::str::contains("Decoded: 2 channel(s), 100 samples per channel"));
}

#[test]
fn test_writes_raster() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "tone.wav", &canonical_wav_bytes(1, 8000, 8, &[7u8; 64]));
    let raster = dir.path().join("tone.rgba");

    Command::cargo_bin("wavescope")
        .unwrap()
        .arg("-i")
        .arg(&input)
        .arg("--raster")
        .arg(&raster)
        .assert()
        .success()
        .stdout(predicate::str::contains("Raster: 4x4 RGBA"));

    assert_eq!(std::fs::read(&raster).unwrap(), vec![7u8; 64]);
}

#[test]
fn test_config_enables_default_raster_path() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "tone.wav", &canonical_wav_bytes(1, 8000, 8, &[1u8; 4]));
    let config = fixture(&dir, "wavescope.toml", b"[raster]\nenabled = true\nextension = \"raw\"\n");

    Command::cargo_bin("wavescope")
        .unwrap()
        .arg("-i")
        .arg(&input)
        .arg("-c")
        .arg(&config)
        .assert()
        .success();

    assert!(dir.path().join("tone.wav.raw").exists());
}

#[test]
fn test_rejects_bad_file() {
    let dir = TempDir::new().unwrap();
    let mut bytes = canonical_wav_bytes(2, 44100, 16, &[0u8; 8]);
    bytes.pop();
    let input = fixture(&dir, "short.wav", &bytes);

    Command::cargo_bin("wavescope")
        .unwrap()
        .arg("-i")
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Data size mismatch: header declares 8 bytes, file carries 7"));
}

#[test]
fn test_missing_input() {
    Command::cargo_bin("wavescope")
        .unwrap()
        .args(["-i", "/nonexistent/missing.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read audio file"));
}
