use std::path::Path;

use config::{Config as CConfig, ConfigBuilder, Environment, File, FileFormat, Map};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};

use crate::{
    conf::{DatabaseConfig, LoggingConfig, SourceConfig},
    core::{
        CliArgs,
        IngestError::{self, ConfigParsingError},
    },
};

const ENV_PREFIX: &str = "INGESTDB";
const SECTIONS: &[&str] = &["source", "database", "logging"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, IngestError> {
        let builder =
            CConfig::builder().add_source(File::from_str(toml_str, FileFormat::Toml));
        Self::build(builder)
    }

    /// Defaults, then the optional TOML file, then `INGESTDB_<SECTION>__<KEY>` variables.
    pub fn load(path: Option<&Path>) -> Result<Config, IngestError> {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::load_with_env(path, vars)
    }

    fn load_with_env<I>(path: Option<&Path>, vars: I) -> Result<Config, IngestError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(section_vars(vars))),
        );
        Self::build(builder)
    }

    /// Command-line flags win over every other source.
    pub fn with_args(mut self, args: &CliArgs) -> Config {
        if let Some(data_dir) = &args.data_dir {
            self.source.data_dir = data_dir.clone();
        }
        if let Some(database) = &args.database {
            self.database.path = database.clone();
        }
        self
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, IngestError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), IngestError> {
        if !self.source.delimiter.is_ascii() {
            return Err(ConfigParsingError(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.source.delimiter
            )));
        }
        if self.source.chunk_rows == 0 {
            return Err(ConfigParsingError("source.chunk_rows must be positive".into()));
        }
        if self.source.suffix.is_empty() {
            return Err(ConfigParsingError("source.suffix must not be empty".into()));
        }
        Ok(())
    }
}

/// Keeps only `INGESTDB_<SECTION>__<KEY>` variables naming a known section.
fn section_vars<I>(vars: I) -> Map<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let prefix = format!("{}_", ENV_PREFIX);
    vars.into_iter()
        .filter(|(key, _)| {
            key.strip_prefix(&prefix)
                .and_then(|rest| rest.split_once("__"))
                .is_some_and(|(section, _)| {
                    SECTIONS.contains(&section.to_ascii_lowercase().as_str())
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn load_empty_toml_gives_defaults() {
        let conf = Config::from_str("");
        assert_eq!(conf, Ok(Config::default()));
    }

    #[test]
    fn load_correct_toml() {
        let toml = r#"
        [source]
        data_dir = "/srv/input"
        suffix = "orders.csv"
        large_file_threshold = 1024

        [database]
        path = "/srv/out.db"
        timeout = "5s"

        [logging]
        file = "/tmp/ingest.log"
        "#;
        let conf = Config::from_str(toml).unwrap();
        assert_eq!(conf.source.data_dir, PathBuf::from("/srv/input"));
        assert_eq!(conf.source.suffix, "orders.csv");
        assert_eq!(conf.source.large_file_threshold, 1024);
        assert_eq!(conf.source.chunk_rows, 1000);
        assert_eq!(conf.database.path, PathBuf::from("/srv/out.db"));
        assert_eq!(conf.database.timeout, Duration::from_secs(5));
        assert_eq!(conf.logging.file, PathBuf::from("/tmp/ingest.log"));
    }

    #[test]
    fn reject_unknown_field() {
        let toml = r#"
        [source]
        colour = "blue"
        "#;
        assert!(matches!(Config::from_str(toml), Err(ConfigParsingError(_))));
    }

    #[test]
    fn reject_non_ascii_delimiter() {
        let toml = r#"
        [source]
        delimiter = "§"
        "#;
        assert!(matches!(Config::from_str(toml), Err(ConfigParsingError(_))));
    }

    #[test]
    fn reject_zero_chunk_rows() {
        let toml = r#"
        [source]
        chunk_rows = 0
        "#;
        assert!(matches!(Config::from_str(toml), Err(ConfigParsingError(_))));
    }

    #[test]
    fn args_override_paths() {
        let args = CliArgs {
            config: None,
            data_dir: Some(PathBuf::from("elsewhere")),
            database: Some(PathBuf::from("other.db")),
            log_memory: false,
        };
        let conf = Config::default().with_args(&args);
        assert_eq!(conf.source.data_dir, PathBuf::from("elsewhere"));
        assert_eq!(conf.database.path, PathBuf::from("other.db"));
        assert_eq!(conf.logging, LoggingConfig::default());
    }

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unrelated_env_vars_are_ignored() {
        let vars = env(&[
            ("INGEST_MODE", "fast"),
            ("INGESTDB_MODE", "fast"),
            ("INGESTDB_CACHE__SIZE", "10"),
            ("PATH", "/usr/bin"),
        ]);
        let conf = Config::load_with_env(None, vars);
        assert_eq!(conf, Ok(Config::default()));
    }

    #[test]
    fn section_env_vars_override_defaults() {
        let vars = env(&[
            ("INGESTDB_SOURCE__SUFFIX", "orders.csv"),
            ("INGESTDB_SOURCE__CHUNK_ROWS", "50"),
            ("INGESTDB_DATABASE__TIMEOUT", "3s"),
        ]);
        let conf = Config::load_with_env(None, vars).unwrap();
        assert_eq!(conf.source.suffix, "orders.csv");
        assert_eq!(conf.source.chunk_rows, 50);
        assert_eq!(conf.database.timeout, Duration::from_secs(3));
    }

    #[test]
    fn unknown_key_in_known_section_is_rejected() {
        let vars = env(&[("INGESTDB_SOURCE__COLOUR", "blue")]);
        assert!(matches!(
            Config::load_with_env(None, vars),
            Err(ConfigParsingError(_))
        ));
    }

    #[test]
    fn load_missing_file_fails() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(err, Err(ConfigParsingError(_))));
    }
}
