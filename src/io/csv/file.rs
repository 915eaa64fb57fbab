use std::path::{Path, PathBuf};

use crate::core::IngestError;

/// One input file: where it lives, how big it is and which table it feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvFile {
    path: PathBuf,
    size: u64,
    table_name: String,
}

impl CsvFile {
    pub fn stat(path: impl Into<PathBuf>) -> Result<Self, IngestError> {
        let path = path.into();
        let metadata = std::fs::metadata(&path).map_err(|e| {
            IngestError::ReadError(format!("reading metadata for {}: {}", path.display(), e))
        })?;
        let table_name = table_name_for(&path).ok_or_else(|| {
            IngestError::ReadError(format!("cannot derive table name from {}", path.display()))
        })?;
        Ok(Self {
            size: metadata.len(),
            path,
            table_name,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The file name with its final extension removed: `q1.sales.csv` -> `q1.sales`.
pub fn table_name_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
