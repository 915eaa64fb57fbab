mod file;
mod reader;

pub use file::{CsvFile, table_name_for};
pub use reader::CsvReader;
