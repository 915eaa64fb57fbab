mod report;

use std::path::PathBuf;

use log::{debug, info};

use crate::conf::Config;
use crate::core::{IngestError, log_memory_usage};
use crate::io::csv::{CsvFile, CsvReader};
use crate::io::sqlite::{Database, TableLoader};

pub use report::{IngestReport, LoadedTable};

/// Loads every matching file of the data directory into its own table.
///
/// Files are handled one at a time in file-name order. The first failure
/// stops the run: tables loaded before it stay in place, later files are not
/// touched.
pub struct IngestService {
    config: Config,
    reader: CsvReader,
    database: Database,
    log_memory: bool,
}

impl IngestService {
    pub fn new(config: Config) -> Self {
        let reader = CsvReader::new(&config.source);
        let database = Database::new(&config.database);
        Self {
            config,
            reader,
            database,
            log_memory: false,
        }
    }

    pub fn with_memory_logging(mut self, enabled: bool) -> Self {
        self.log_memory = enabled;
        self
    }

    /// Matching files of the data directory, sorted by name.
    pub fn discover(&self) -> Result<Vec<CsvFile>, IngestError> {
        let data_dir = self.data_dir()?;
        if !data_dir.is_dir() {
            return Err(IngestError::SetupError(format!(
                "Data directory not found: {}",
                data_dir.display()
            )));
        }

        let suffix = &self.config.source.suffix;
        let read_err = |e: std::io::Error| {
            IngestError::SetupError(format!("reading directory {}: {}", data_dir.display(), e))
        };
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(&data_dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!("skipping {}: file name is not valid UTF-8", path.display());
                continue;
            };
            if !name.ends_with(suffix.as_str()) {
                continue;
            }
            if !path.is_file() {
                debug!("skipping {}: not a regular file", path.display());
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        paths.into_iter().map(CsvFile::stat).collect()
    }

    pub fn run(&self) -> Result<IngestReport, IngestError> {
        let files = self.discover()?;
        info!(
            "Found {} files ending in '{}' in {}",
            files.len(),
            self.config.source.suffix,
            self.config.source.data_dir.display()
        );

        let mut report = IngestReport::default();
        for file in &files {
            report.tables.push(self.ingest(file)?);
        }

        info!(
            "Ingested {} tables, {} rows in total",
            report.tables.len(),
            report.total_rows()
        );
        Ok(report)
    }

    /// Read one file and replace its table.
    pub fn ingest(&self, file: &CsvFile) -> Result<LoadedTable, IngestError> {
        println!("Found {}", file.file_name());
        let batch = self.reader.read(file)?;
        if self.log_memory {
            log_memory_usage();
        }

        println!(
            "Processing {} into table {}",
            file.path().display(),
            file.table_name()
        );
        // One connection per load, closed when it goes out of scope.
        let mut conn = self.database.connect()?;
        let rows = TableLoader::new(&mut conn).load(&batch, file.table_name())?;
        println!("done");

        Ok(LoadedTable {
            table: file.table_name().to_string(),
            rows,
            columns: batch.num_columns(),
        })
    }

    fn data_dir(&self) -> Result<PathBuf, IngestError> {
        let cwd = std::env::current_dir()?;
        Ok(cwd.join(&self.config.source.data_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{generate_sales_csv, test_config, write_csv};
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn count_rows(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |r| r.get(0))
            .unwrap()
    }

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |r| r.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let data = &config.source.data_dir;
        generate_sales_csv(&data.join("b_sales.csv"), 1, 0).unwrap();
        generate_sales_csv(&data.join("a_sales.csv"), 1, 0).unwrap();
        generate_sales_csv(&data.join("purchases.csv"), 1, 0).unwrap();
        generate_sales_csv(&data.join("sales.csv.bak"), 1, 0).unwrap();
        std::fs::create_dir_all(data.join("nested_sales.csv")).unwrap();

        let files = IngestService::new(config).discover().unwrap();
        let tables: Vec<&str> = files.iter().map(|f| f.table_name()).collect();
        assert_eq!(tables, vec!["a_sales", "b_sales"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let data = &config.source.data_dir;
        generate_sales_csv(&data.join("ok_sales.csv"), 1, 0).unwrap();
        let odd = data.join(OsStr::from_bytes(b"bad\xffsales.csv"));
        // Some filesystems refuse non-UTF-8 names outright.
        if std::fs::write(&odd, "id\n1\n").is_err() {
            return;
        }

        let files = IngestService::new(config).discover().unwrap();
        let tables: Vec<&str> = files.iter().map(|f| f.table_name()).collect();
        assert_eq!(tables, vec!["ok_sales"]);
    }

    #[test]
    fn test_missing_data_dir_is_setup_error() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let db_path = config.database.path.clone();

        let err = IngestService::new(config).run().unwrap_err();
        assert!(matches!(err, IngestError::SetupError(_)));
        assert!(!db_path.exists());
    }

    #[test]
    fn test_fifty_row_sales_file() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        generate_sales_csv(&config.source.data_dir.join("sales.csv"), 50, 7).unwrap();
        let db_path = config.database.path.clone();

        let report = IngestService::new(config).run().unwrap();
        assert_eq!(
            report.tables,
            vec![LoadedTable {
                table: "sales".to_string(),
                rows: 50,
                columns: 3,
            }]
        );

        let conn = Connection::open(db_path).unwrap();
        assert_eq!(count_rows(&conn, "sales"), 50);
    }

    #[test]
    fn test_bad_file_stops_the_run() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let data = config.source.data_dir.clone();
        write_csv(
            &data.join("a_sales.csv"),
            &["id", "amount"],
            vec![vec!["1".to_string()], vec!["2".to_string(), "3".to_string()]],
        )
        .unwrap();
        generate_sales_csv(&data.join("b_sales.csv"), 10, 1).unwrap();
        let db_path = config.database.path.clone();

        let err = IngestService::new(config).run().unwrap_err();
        assert!(matches!(err, IngestError::ReadError(_)));

        if db_path.exists() {
            let conn = Connection::open(&db_path).unwrap();
            assert!(!table_exists(&conn, "b_sales"));
        }
    }

    #[test]
    fn test_rerun_replaces_tables() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let path = config.source.data_dir.join("sales.csv");
        let db_path = config.database.path.clone();

        generate_sales_csv(&path, 20, 1).unwrap();
        IngestService::new(config.clone()).run().unwrap();

        write_csv(&path, &["sku"], vec![vec!["x1".to_string()]]).unwrap();
        IngestService::new(config).run().unwrap();

        let conn = Connection::open(db_path).unwrap();
        assert_eq!(count_rows(&conn, "sales"), 1);
        let columns: i64 = conn
            .query_row("SELECT COUNT(*) FROM pragma_table_info('sales')", [], |r| r.get(0))
            .unwrap();
        assert_eq!(columns, 1);
    }

    #[test]
    fn test_empty_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.source.data_dir).unwrap();

        let report = IngestService::new(config).run().unwrap();
        assert!(report.tables.is_empty());
    }
}
