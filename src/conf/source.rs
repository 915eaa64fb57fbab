use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where input files come from and how they are parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default = "SourceConfig::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "SourceConfig::default_suffix")]
    pub suffix: String,
    /// Files larger than this many bytes are parsed in row chunks.
    #[serde(default = "SourceConfig::default_large_file_threshold")]
    pub large_file_threshold: u64,
    #[serde(default = "SourceConfig::default_chunk_rows")]
    pub chunk_rows: usize,
    #[serde(default = "SourceConfig::default_delimiter")]
    pub delimiter: char,
}

impl SourceConfig {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("data")
    }

    fn default_suffix() -> String {
        String::from("sales.csv")
    }

    fn default_large_file_threshold() -> u64 {
        200_000_000
    }

    fn default_chunk_rows() -> usize {
        1000
    }

    fn default_delimiter() -> char {
        ','
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            suffix: Self::default_suffix(),
            large_file_threshold: Self::default_large_file_threshold(),
            chunk_rows: Self::default_chunk_rows(),
            delimiter: Self::default_delimiter(),
        }
    }
}
