//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::conf::{Config, DatabaseConfig, LoggingConfig, SourceConfig};

const PRODUCTS: &[&str] = &["apple", "pear", "plum", "fig", "kiwi"];

/// A config rooted at `root`: input in `root/data`, database `root/inventory.db`,
/// log file `root/logs/ingestion_db.log`.
pub fn test_config(root: &Path) -> Config {
    Config {
        source: SourceConfig {
            data_dir: root.join("data"),
            ..SourceConfig::default()
        },
        database: DatabaseConfig {
            path: root.join("inventory.db"),
            ..DatabaseConfig::default()
        },
        logging: LoggingConfig {
            file: root.join("logs").join("ingestion_db.log"),
        },
    }
}

/// Write a CSV file with the given header and rows, creating parent directories.
pub fn write_csv<I, R>(path: &Path, header: &[&str], rows: I) -> std::io::Result<()>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", header.join(","))?;
    for row in rows {
        writeln!(out, "{}", row.as_ref().join(","))?;
    }
    out.flush()
}

/// Generate a deterministic `id,name,amount` sales file.
///
/// `id` is the row index, `name` cycles through a fixed product list and
/// `amount` is a seeded random price with two decimals.
pub fn generate_sales_csv(path: &Path, num_rows: usize, seed: u64) -> std::io::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..num_rows).map(|i| {
        let cents: u32 = rng.gen_range(100..100_000);
        vec![
            i.to_string(),
            PRODUCTS[i % PRODUCTS.len()].to_string(),
            format!("{}.{:02}", cents / 100, cents % 100),
        ]
    });
    write_csv(path, &["id", "name", "amount"], rows)
}
