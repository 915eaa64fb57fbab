use std::fs::{self, OpenOptions};
use std::io::Write;

use env_logger::Target;

use crate::conf::LoggingConfig;
use crate::core::IngestError;

/// Routes the `log` facade into the append-only ingestion log file.
///
/// Every record is written as `<timestamp> - <LEVEL> - <message>`. The level
/// defaults to INFO and can still be overridden through `RUST_LOG`.
pub fn setup_logging(config: &LoggingConfig) -> Result<(), IngestError> {
    if let Some(parent) = config.file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                IngestError::SetupError(format!(
                    "creating log directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|e| {
            IngestError::SetupError(format!(
                "opening log file {}: {}",
                config.file.display(),
                e
            ))
        })?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| IngestError::SetupError(format!("installing logger: {}", e)))
}
