//! Counter construction parameters loaded from TOML.
//!
//! ```toml
//! initial_value = 30
//! flags = ["cloexec", "nonblock"]
//! ```

use crate::error::{CounterError, Result};
use crate::flags::FlagSet;
use crate::handle::CounterHandle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parameters for creating a [`CounterHandle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Initial counter value
    #[serde(default)]
    pub initial_value: u64,

    /// Flag names (`cloexec`, `nonblock`, `semaphore`)
    #[serde(default)]
    pub flags: Vec<String>,
}

impl CounterConfig {
    /// Creates a configuration from an initial value and flag set.
    pub fn new(initial_value: u64, flags: FlagSet) -> Self {
        Self {
            initial_value,
            flags: flags
                .iter_names()
                .map(|(name, _)| name.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CounterError::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from file, falling back to defaults if not found.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CounterError::Configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(CounterError::Io(e)),
        }
    }

    /// Saves configuration to file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            CounterError::Configuration(format!("Failed to serialize config: {}", e))
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolves the flag names into a flag set.
    pub fn flag_set(&self) -> Result<FlagSet> {
        FlagSet::from_names(&self.flags)
            .map_err(|e| CounterError::Configuration(e.to_string()))
    }

    /// Validates configuration.
    pub fn validate(&self) -> Result<()> {
        self.flag_set()?;

        if u32::try_from(self.initial_value).is_err() {
            return Err(CounterError::Configuration(format!(
                "initial_value must be <= {}",
                u32::MAX
            )));
        }

        Ok(())
    }

    /// Validates the configuration and creates the counter.
    pub fn open(&self) -> Result<CounterHandle> {
        self.validate()?;
        CounterHandle::new(self.initial_value, self.flag_set()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = CounterConfig::default();
        assert_eq!(config.initial_value, 0);
        assert!(config.flags.is_empty());
        assert_eq!(config.flag_set().unwrap(), FlagSet::empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_lists_flag_names() {
        let config = CounterConfig::new(5, FlagSet::CLOEXEC | FlagSet::SEMAPHORE);
        assert_eq!(config.flags, vec!["cloexec", "semaphore"]);
        assert_eq!(
            config.flag_set().unwrap(),
            FlagSet::CLOEXEC | FlagSet::SEMAPHORE
        );
    }

    #[test]
    fn test_toml_deserialization() {
        let config = CounterConfig::from_toml_str(
            r#"
initial_value = 30
flags = ["EFD_CLOEXEC", "nonblock"]
"#,
        )
        .unwrap();
        assert_eq!(config.initial_value, 30);
        assert_eq!(config.flag_set().unwrap(), FlagSet::CLOEXEC | FlagSet::NONBLOCK);
    }

    #[test]
    fn test_toml_missing_fields_use_defaults() {
        let config = CounterConfig::from_toml_str("initial_value = 4").unwrap();
        assert_eq!(config.initial_value, 4);
        assert!(config.flags.is_empty());
    }

    #[test]
    fn test_toml_parse_error() {
        let err = CounterConfig::from_toml_str("initial_value = \"many\"").unwrap_err();
        assert!(matches!(err, CounterError::Configuration(_)));
    }

    #[test]
    fn test_validate_unknown_flag() {
        let config = CounterConfig {
            initial_value: 0,
            flags: vec!["direct".to_string()],
        };
        assert!(matches!(
            config.validate(),
            Err(CounterError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_initial_value_too_large() {
        let config = CounterConfig {
            initial_value: u64::from(u32::MAX) + 1,
            flags: Vec::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let config = CounterConfig::new(9, FlagSet::NONBLOCK);
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("initial_value = 9"));
        assert!(toml_str.contains("nonblock"));
    }

    #[test]
    fn test_load_nonexistent_file_defaults() {
        let config = CounterConfig::load_or_default("/nonexistent/eventfd.toml").unwrap();
        assert_eq!(config, CounterConfig::default());
    }
}
