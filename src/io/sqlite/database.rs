use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use rusqlite::Connection;

use crate::conf::DatabaseConfig;
use crate::core::IngestError;

/// A SQLite database file. Holds no open handle: every [`Database::connect`]
/// opens a fresh connection that closes when dropped.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    timeout: Duration,
}

impl Database {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            path: config.path.clone(),
            timeout: config.timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection, IngestError> {
        debug!("opening connection to {}", self.path.display());
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.timeout)?;
        Ok(conn)
    }
}
