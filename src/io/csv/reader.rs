use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use log::{debug, error, info};

use crate::conf::SourceConfig;
use crate::core::IngestError;

use super::file::CsvFile;

/// Parses delimited text files into a single [`RecordBatch`].
///
/// The first line is the header. Column types are inferred from the whole
/// file: integers, floats and booleans become typed columns, anything else is
/// text. Empty fields are null.
///
/// Files above `large_file_threshold` bytes are decoded `chunk_rows` rows at a
/// time and the chunks are concatenated in order. Smaller files are decoded
/// from a single in-memory buffer.
pub struct CsvReader {
    delimiter: u8,
    large_file_threshold: u64,
    chunk_rows: usize,
}

impl CsvReader {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            // Config validation guarantees an ASCII delimiter.
            delimiter: config.delimiter as u8,
            large_file_threshold: config.large_file_threshold,
            chunk_rows: config.chunk_rows,
        }
    }

    pub fn read(&self, file: &CsvFile) -> Result<RecordBatch, IngestError> {
        let result = if file.size() > self.large_file_threshold {
            self.read_chunked(file.path())
        } else {
            self.read_whole(file.path())
        };

        match result {
            Ok(batch) => {
                let line = format!(
                    "Read file: {}, File Size: {}, Shape: ({}, {})",
                    file.file_name(),
                    file.size(),
                    batch.num_rows(),
                    batch.num_columns()
                );
                println!("{line}");
                info!("{line}");
                Ok(batch)
            }
            Err(e) => {
                error!("Error reading file: {}", e);
                Err(IngestError::ReadError(format!("{}: {}", file.file_name(), e)))
            }
        }
    }

    fn format(&self) -> Format {
        Format::default()
            .with_header(true)
            .with_delimiter(self.delimiter)
    }

    /// Header-derived schema with unique names and the record count seen.
    fn infer<R: Read>(&self, input: R) -> Result<(SchemaRef, usize), IngestError> {
        let (schema, records) = self.format().infer_schema(input, None)?;
        if schema.fields().is_empty() {
            return Err(IngestError::ReadError("no columns to parse from file".into()));
        }
        Ok((unique_headers(schema), records))
    }

    fn builder(&self, schema: SchemaRef, batch_size: usize) -> ReaderBuilder {
        ReaderBuilder::new(schema)
            .with_header(true)
            .with_delimiter(self.delimiter)
            .with_batch_size(batch_size)
    }

    fn read_whole(&self, path: &Path) -> Result<RecordBatch, IngestError> {
        let bytes = std::fs::read(path).map_err(|e| {
            IngestError::IoError(format!("reading {}: {}", path.display(), e))
        })?;
        let (schema, _) = self.infer(bytes.as_slice())?;

        // Upper bound on the record count so the decoder emits one batch.
        let lines = bytes.iter().filter(|b| **b == b'\n').count() + 1;
        let reader = self.builder(schema.clone(), lines).build(bytes.as_slice())?;
        let batches = reader.collect::<Result<Vec<_>, _>>()?;
        Ok(concat_batches(&schema, &batches)?)
    }

    fn read_chunked(&self, path: &Path) -> Result<RecordBatch, IngestError> {
        let mut file = File::open(path).map_err(|e| {
            IngestError::IoError(format!("opening {}: {}", path.display(), e))
        })?;
        let (schema, records) = self.infer(&mut file)?;
        file.rewind()?;

        debug!(
            "{}: decoding {} records in chunks of {}",
            path.display(),
            records,
            self.chunk_rows
        );

        let reader = self.builder(schema.clone(), self.chunk_rows).build(file)?;
        let mut chunks = Vec::new();
        for chunk in reader {
            chunks.push(chunk?);
        }
        debug!("{}: concatenating {} chunks", path.display(), chunks.len());

        Ok(concat_batches(&schema, &chunks)?)
    }
}

/// Repeated header names get a `.N` suffix, so `a,a,b` reads as `a,a.1,b`.
/// Names are compared case-insensitively like SQLite column names, so `Id,id`
/// reads as `Id,id.1`.
fn unique_headers(schema: Schema) -> SchemaRef {
    let mut used: HashSet<String> = HashSet::new();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| {
            let base = field.name();
            let mut name = base.clone();
            let mut n = 1;
            while !used.insert(name.to_lowercase()) {
                name = format!("{}.{}", base, n);
                n += 1;
            }
            field.as_ref().clone().with_name(name)
        })
        .collect();
    Arc::new(Schema::new(fields))
}
