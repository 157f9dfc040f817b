use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pollingFreq must be greater than zero")]
    ZeroPollingFreq,
}

/// Settings for instream delivery tracking
///
/// Keys present in the user's config override the defaults one by one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackingConfig {
    pub enabled: bool,
    /// How long after the auction to keep polling, in ms
    #[serde(rename = "maxWindow")]
    pub max_window_ms: u64,
    /// Delay between poll passes, in ms
    #[serde(rename = "pollingFreq")]
    pub polling_freq_ms: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_window_ms: 10_000,
            polling_freq_ms: 500,
        }
    }
}

impl TrackingConfig {
    pub fn max_window(&self) -> Duration {
        Duration::from_millis(self.max_window_ms)
    }

    pub fn polling_freq(&self) -> Duration {
        Duration::from_millis(self.polling_freq_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub instream_tracking: TrackingConfig,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        // a zero interval would reschedule with no delay at all
        if config.instream_tracking.polling_freq_ms == 0 {
            return Err(ConfigError::ZeroPollingFreq);
        }
        Ok(config)
    }

    /// Load from `path`, or use the defaults if none is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_json(&json)
            }
        }
    }
}
