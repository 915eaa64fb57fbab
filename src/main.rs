use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use ingestdb::conf::Config;
use ingestdb::core::{CliArgs, setup_logging};
use ingestdb::service::IngestService;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = Config::load(args.config.as_deref()).map(|c| c.with_args(&args));

    // A broken config still gets its fatal line in the default log file.
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    if let Err(e) = setup_logging(&logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    info!("Ingestion started.");

    let result = config.and_then(|config| {
        IngestService::new(config)
            .with_memory_logging(args.log_memory)
            .run()
    });

    let code = match result {
        Ok(report) => {
            info!(
                "Ingestion finished: {} tables, {} rows",
                report.tables.len(),
                report.total_rows()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    };
    log::logger().flush();
    code
}
