/// What a single file turned into.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub tables: Vec<LoadedTable>,
}

impl IngestReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}
