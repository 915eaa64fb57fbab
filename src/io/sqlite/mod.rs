mod batch;
mod column;
mod database;
mod loader;

pub use batch::{SQLITE_VARIABLE_LIMIT, batch_size};
pub use column::{SqlColumn, SqlType, quote_ident};
pub use database::Database;
pub use loader::TableLoader;
