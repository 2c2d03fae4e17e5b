//! Configuration round-trip and validation behavior

use metrorec::config::MetrorecConfig;

#[test]
fn defaults_describe_the_standard_count_in() {
    let config = MetrorecConfig::default();
    // Eight one-second ticks, 120 BPM click
    assert_eq!(config.countdown.start_value, 8);
    assert_eq!(config.countdown.tick_ms, 1_000);
    assert_eq!(config.metronome.bpm, 120);
    assert!(config.validate().is_ok());
}

#[test]
fn round_trips_through_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrorec.toml");

    let mut config = MetrorecConfig::default();
    config.countdown.start_value = 4;
    config.metronome.bpm = 90;
    config.storage.file_prefix = "take".to_string();
    config.save_to_file(&path).unwrap();

    let loaded = MetrorecConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.countdown.start_value, 4);
    assert_eq!(loaded.metronome.bpm, 90);
    assert_eq!(loaded.storage.file_prefix, "take");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = MetrorecConfig::load_from_file(dir.path().join("absent.toml")).unwrap();
    assert_eq!(loaded.countdown.start_value, 8);
}

#[test]
fn malformed_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "countdown = 'not a table'").unwrap();
    assert!(MetrorecConfig::load_from_file(&path).is_err());
}

#[test]
fn validation_rejects_out_of_range_values() {
    let base = MetrorecConfig::default();

    let mut config = base.clone();
    config.recording.sample_rate = 1_000;
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.recording.channels = 0;
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.metronome.volume = 5.0;
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.countdown.tick_ms = 1;
    assert!(config.validate().is_err());

    let mut config = base;
    config.storage.output_directory = String::new();
    assert!(config.validate().is_err());
}
