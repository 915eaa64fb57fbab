use std::time::Instant;

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use log::{debug, error, info};
use rusqlite::{Connection, params_from_iter};

use crate::core::IngestError;

use super::batch::batch_size;
use super::column::{SqlColumn, SqlType, quote_ident};

/// Logs how long a load took when it goes out of scope, whatever the outcome.
struct Elapsed {
    started: Instant,
}

impl Elapsed {
    fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Drop for Elapsed {
    fn drop(&mut self) {
        info!(
            "Time taken: {:.2} minutes",
            self.started.elapsed().as_secs_f64() / 60.0
        );
    }
}

/// Writes record batches into SQLite tables with replace semantics.
pub struct TableLoader<'a> {
    conn: &'a mut Connection,
}

impl<'a> TableLoader<'a> {
    pub fn new(conn: &'a mut Connection) -> TableLoader<'a> {
        Self { conn }
    }

    /// Drops `table_name` if present, recreates it from the batch schema and
    /// inserts every row in order. Returns the number of rows written.
    ///
    /// The drop, create and inserts share one transaction, so on failure the
    /// previous table (if any) is left untouched.
    pub fn load(&mut self, batch: &RecordBatch, table_name: &str) -> Result<usize, IngestError> {
        let chunk_rows = batch_size(batch.num_columns());
        let _elapsed = Elapsed::start();

        let result = self.replace(batch, table_name, chunk_rows);
        match &result {
            Ok(_) => info!("Data ingested into table {} successfully", table_name),
            Err(e) if e.is_operational() => {
                error!("{}", e);
                println!("{}", e);
            }
            Err(e) => error!("Error ingesting {}: {}", table_name, e),
        }
        result
    }

    fn replace(
        &mut self,
        batch: &RecordBatch,
        table_name: &str,
        chunk_rows: usize,
    ) -> Result<usize, IngestError> {
        if chunk_rows == 0 {
            return Err(IngestError::InvalidBatchSize {
                table: table_name.to_string(),
                columns: batch.num_columns(),
            });
        }

        let columns = batch
            .columns()
            .iter()
            .map(SqlColumn::from_array)
            .collect::<Result<Vec<_>, _>>()?;

        let schema = batch.schema();
        let table = quote_ident(table_name);
        let names = schema
            .fields()
            .iter()
            .map(|f| quote_ident(f.name()))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", table))?;
        tx.execute_batch(&create_table_sql(&table, &schema))?;

        let num_rows = batch.num_rows();
        let mut start = 0;
        let mut chunks = 0;
        while start < num_rows {
            let len = chunk_rows.min(num_rows - start);
            let sql = insert_sql(&table, &names, columns.len(), len);
            let mut stmt = tx.prepare_cached(&sql)?;
            let params = (start..start + len)
                .flat_map(|row| columns.iter().map(move |column| column.value(row)));
            stmt.execute(params_from_iter(params))?;
            start += len;
            chunks += 1;
        }
        tx.commit()?;

        debug!(
            "{}: wrote {} rows in {} chunks of up to {}",
            table_name, num_rows, chunks, chunk_rows
        );
        Ok(num_rows)
    }
}

fn create_table_sql(table: &str, schema: &Schema) -> String {
    let columns = schema
        .fields()
        .iter()
        .map(|f| {
            format!(
                "{} {}",
                quote_ident(f.name()),
                SqlType::from_arrow(f.data_type()).declared()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", table, columns)
}

fn insert_sql(table: &str, names: &str, columns: usize, rows: usize) -> String {
    let row = format!("({})", vec!["?"; columns].join(", "));
    format!(
        "INSERT INTO {} ({}) VALUES {}",
        table,
        names,
        vec![row; rows].join(", ")
    )
}
