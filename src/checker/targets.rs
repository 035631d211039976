//! The server list read by the checker.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout used when neither the server nor the settings give a usable one.
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

/// Contents of the servers file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServersFile {
    pub servers: Vec<ServerTarget>,
    #[serde(default)]
    pub settings: CheckSettings,
}

/// One monitored server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerTarget {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Per-server timeout in seconds.
    #[serde(default)]
    pub timeout: Option<f64>,
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSettings {
    #[serde(default = "default_timeout")]
    pub default_timeout: f64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_expected_status() -> u16 {
    200
}

fn default_enabled() -> bool {
    true
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

/// Zero, negative, NaN and overflowing values are unusable.
fn positive_secs(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok().filter(|d| !d.is_zero())
}

impl ServerTarget {
    /// Request timeout for this server.
    pub fn timeout(&self, settings: &CheckSettings) -> Duration {
        self.timeout
            .and_then(positive_secs)
            .or_else(|| positive_secs(settings.default_timeout))
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS as u64))
    }
}
