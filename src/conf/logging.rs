use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_file")]
    pub file: PathBuf,
}

impl LoggingConfig {
    fn default_file() -> PathBuf {
        PathBuf::from("logs/ingestion_db.log")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
        }
    }
}
