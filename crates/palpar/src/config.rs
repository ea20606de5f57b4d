//! Configuration for waits and capture storage.
//!
//! Loaded once at process start and treated as immutable afterwards.
//! Different target applications render at different speeds, so polling
//! frequency and total wait timeout are configuration, not constants.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::result::{PalparError, PalparResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};

/// Default screenshot storage directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Palpar configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalparConfig {
    /// Polling interval for existence waits, in milliseconds
    pub poll_interval_ms: u64,
    /// Total existence-wait timeout, in milliseconds
    pub wait_timeout_ms: u64,
    /// Directory screenshots are stored under
    pub screenshot_dir: PathBuf,
}

impl Default for PalparConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
        }
    }
}

impl PalparConfig {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> PalparConfigBuilder {
        PalparConfigBuilder::default()
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PalparError::ConfigError`] when the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> PalparResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| PalparError::ConfigError {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&raw).map_err(|e| PalparError::ConfigError {
            message: format!("cannot parse {}: {e}", path.display()),
        })
    }

    /// The wait options derived from this configuration.
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.wait_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

/// Builder for [`PalparConfig`].
#[derive(Debug, Clone, Default)]
pub struct PalparConfigBuilder {
    config: PalparConfig,
}

impl PalparConfigBuilder {
    /// Set the polling interval in milliseconds.
    #[must_use]
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// Set the total wait timeout in milliseconds.
    #[must_use]
    pub fn wait_timeout_ms(mut self, ms: u64) -> Self {
        self.config.wait_timeout_ms = ms;
        self
    }

    /// Set the screenshot storage directory.
    #[must_use]
    pub fn screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.screenshot_dir = dir.into();
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> PalparConfig {
        self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PalparConfig::default();
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.wait_timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
        assert_eq!(config.screenshot_dir, PathBuf::from("screenshots"));
    }

    #[test]
    fn test_builder_chain() {
        let config = PalparConfig::builder()
            .poll_interval_ms(100)
            .wait_timeout_ms(3000)
            .screenshot_dir("captures")
            .build();
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.wait_timeout_ms, 3000);
        assert_eq!(config.screenshot_dir, PathBuf::from("captures"));
    }

    #[test]
    fn test_wait_options_derivation() {
        let config = PalparConfig::builder()
            .poll_interval_ms(50)
            .wait_timeout_ms(1000)
            .build();
        let options = config.wait_options();
        assert_eq!(options.poll_interval_ms, 50);
        assert_eq!(options.timeout_ms, 1000);
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palpar.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"poll_interval_ms": 250, "wait_timeout_ms": 5000, "screenshot_dir": "shots"}}"#
        )
        .unwrap();

        let config = PalparConfig::load(&path).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.wait_timeout_ms, 5000);
        assert_eq!(config.screenshot_dir, PathBuf::from("shots"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PalparConfig::load("/nonexistent/palpar.json").unwrap_err();
        assert!(matches!(err, PalparError::ConfigError { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            PalparConfig::load(&path),
            Err(PalparError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = PalparConfig::builder().wait_timeout_ms(1234).build();
        let json = serde_json::to_string(&config).unwrap();
        let back: PalparConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
