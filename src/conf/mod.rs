mod config;
mod database;
mod logging;
mod source;

pub use config::Config;
pub use database::DatabaseConfig;
pub use logging::LoggingConfig;
pub use source::SourceConfig;
