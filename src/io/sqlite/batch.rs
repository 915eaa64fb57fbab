use log::info;

/// Maximum number of bound parameters in one SQLite prepared statement.
pub const SQLITE_VARIABLE_LIMIT: usize = 999;

const SAFETY_FACTOR: f64 = 0.9;

/// Rows per multi-row `INSERT` so that `rows * column_count` stays under
/// [`SQLITE_VARIABLE_LIMIT`], with 10% headroom.
///
/// Returns 0 when a single row already needs `SQLITE_VARIABLE_LIMIT` or more
/// parameters, and for a column count of 0. Callers must treat 0 as unusable.
pub fn batch_size(column_count: usize) -> usize {
    let max_rows = SQLITE_VARIABLE_LIMIT.checked_div(column_count).unwrap_or(0);
    let size = (max_rows as f64 * SAFETY_FACTOR).floor() as usize;
    info!(
        "Calculated chunk size: {} rows for {} columns",
        size, column_count
    );
    size
}
