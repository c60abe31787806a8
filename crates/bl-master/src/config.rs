//! Transport configuration.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Timing and sizing knobs for the transport. Every field has a default,
/// so a TOML file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportConfig {
    /// Host tick period.
    pub tick_interval_ms: u64,
    /// How far ahead of the device clock steps are scheduled.
    pub lookahead_ms: u64,
    /// Delay from `start` to the first step.
    pub start_lead_ms: u64,
    /// Delay applied to manual triggers.
    pub manual_lead_ms: u64,
    pub master_gain: f32,
    /// Voice commands that may be queued for the audio thread.
    pub command_capacity: usize,
    /// Pattern-change notifications that may be queued for the editor.
    pub observer_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 25,
            lookahead_ms: 100,
            start_lead_ms: 50,
            manual_lead_ms: 10,
            master_gain: bl_engine::DEFAULT_MASTER_GAIN,
            command_capacity: 256,
            observer_capacity: 16,
        }
    }
}

impl TransportConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        // A window shorter than the tick would let steps fall due between ticks.
        if self.lookahead_ms <= self.tick_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "lookahead_ms ({}) must exceed tick_interval_ms ({})",
                self.lookahead_ms, self.tick_interval_ms
            )));
        }
        if !self.master_gain.is_finite() || self.master_gain < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "master_gain must be a non-negative number, got {}",
                self.master_gain
            )));
        }
        if self.command_capacity == 0 || self.observer_capacity == 0 {
            return Err(ConfigError::Invalid("queue capacities must be positive".into()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn lookahead_secs(&self) -> f64 {
        self.lookahead_ms as f64 / 1000.0
    }

    pub fn start_lead_secs(&self) -> f64 {
        self.start_lead_ms as f64 / 1000.0
    }

    pub fn manual_lead_secs(&self) -> f64 {
        self.manual_lead_ms as f64 / 1000.0
    }

    /// Frames rendered per host tick at `sample_rate`; at least one.
    pub fn tick_frames(&self, sample_rate: u32) -> usize {
        ((sample_rate as u64 * self.tick_interval_ms) / 1000).max(1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = TransportConfig::from_toml_str("").unwrap();
        assert_eq!(config, TransportConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(25));
        assert!((config.lookahead_secs() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn partial_toml_overrides_named_keys() {
        let config = TransportConfig::from_toml_str("lookahead_ms = 200\nmaster_gain = 0.5\n").unwrap();
        assert_eq!(config.lookahead_ms, 200);
        assert_eq!(config.master_gain, 0.5);
        assert_eq!(config.tick_interval_ms, 25);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = TransportConfig::from_toml_str("tempo = 140").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn lookahead_must_cover_tick() {
        let err = TransportConfig::from_toml_str("tick_interval_ms = 100\nlookahead_ms = 50").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TransportConfig::load("/nonexistent/beatlab.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("beatlab-config-{}.toml", std::process::id()));
        std::fs::write(&path, "start_lead_ms = 80\n").unwrap();
        let config = TransportConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.start_lead_ms, 80);
    }

    #[test]
    fn tick_frames_at_common_rates() {
        let config = TransportConfig::default();
        assert_eq!(config.tick_frames(44100), 1102);
        assert_eq!(config.tick_frames(48000), 1200);
    }
}
