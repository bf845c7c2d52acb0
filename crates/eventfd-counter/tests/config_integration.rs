//! Configuration file integration tests

use eventfd_counter::{CounterConfig, CounterError, FlagSet};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eventfd.toml");

    let config = CounterConfig::new(30, FlagSet::CLOEXEC | FlagSet::NONBLOCK);
    config.save(&path).unwrap();

    let loaded = CounterConfig::load_or_default(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eventfd.toml");
    fs::write(&path, "initial_value = [").unwrap();

    let err = CounterConfig::load_or_default(&path).unwrap_err();
    assert!(matches!(err, CounterError::Configuration(_)));
}

#[test]
fn test_load_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = CounterConfig::load_or_default(dir.path()).unwrap_err();
    assert!(matches!(err, CounterError::Io(_)));
}

#[cfg(target_os = "linux")]
#[test]
fn test_open_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eventfd.toml");
    fs::write(
        &path,
        r#"
initial_value = 3
flags = ["semaphore", "nonblock"]
"#,
    )
    .unwrap();

    let config = CounterConfig::load_or_default(&path).unwrap();
    let counter = config.open().unwrap();
    assert!(counter.is_semaphore());
    assert!(counter.is_nonblocking());
    assert_eq!(counter.consume().unwrap(), 1);
}

#[test]
fn test_open_rejects_invalid_config() {
    let config = CounterConfig {
        initial_value: 1,
        flags: vec!["exclusive".to_string()],
    };
    assert!(matches!(config.open(), Err(CounterError::Configuration(_))));
}
