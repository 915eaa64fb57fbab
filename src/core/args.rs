use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about = "Load *sales.csv files into a local SQLite database")]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory scanned for input files.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// SQLite database file.
    #[arg(long)]
    pub database: Option<PathBuf>,
    /// Log resident memory after each file is read.
    #[arg(long, default_value_t = false)]
    pub log_memory: bool,
}
