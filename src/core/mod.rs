mod args;
mod error;
mod logger;
mod memory;

pub use args::CliArgs;
pub use error::IngestError;
pub use logger::setup_logging;
pub use memory::{log_memory_usage, resident_bytes};
