use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_path")]
    pub path: PathBuf,
    /// How long a connection waits on a locked database before failing.
    #[serde(with = "humantime_serde", default = "DatabaseConfig::default_timeout")]
    pub timeout: Duration,
}

impl DatabaseConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("inventory.db")
    }

    fn default_timeout() -> Duration {
        Duration::from_secs(30)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            timeout: Self::default_timeout(),
        }
    }
}
