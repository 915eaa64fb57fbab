use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("Setup error: {0}")]
    SetupError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Read error: {0}")]
    ReadError(String),
    #[error("Arrow error: {0}")]
    ArrowError(String),
    #[error("SQLite operational error: {0}")]
    SqliteOperationalError(String),
    #[error("Store error: {0}")]
    StoreError(String),
    #[error("Invalid batch size 0 for table '{table}' with {columns} columns")]
    InvalidBatchSize { table: String, columns: usize },
}

impl IngestError {
    /// Errors raised by the storage engine itself rather than by our own code.
    pub fn is_operational(&self) -> bool {
        matches!(self, IngestError::SqliteOperationalError(_))
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::IoError(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for IngestError {
    fn from(err: arrow::error::ArrowError) -> Self {
        IngestError::ArrowError(err.to_string())
    }
}

impl From<rusqlite::Error> for IngestError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, _) => {
                IngestError::SqliteOperationalError(err.to_string())
            }
            other => IngestError::StoreError(other.to_string()),
        }
    }
}
