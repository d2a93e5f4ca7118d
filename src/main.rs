use eyre::Result;
use std::io;
use std::sync::Arc;

use hostprobe::cli;
use hostprobe::input::assemble_targets;
use hostprobe::{create_probes, Dispatcher, OutputFormat, Reporter, ScanConfig, Scanner, SystemResolver};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse();

    // Initialize logging first
    if let Err(e) = hostprobe::init_logging(args.log_file.as_deref()) {
        eprintln!("Warning: Failed to initialize logging: {:#}", e);
    }

    log::info!("================================================================================");
    log::info!("NEW SCAN SESSION STARTING");
    log::info!("================================================================================");

    let config = ScanConfig::from_cli(&args)?;
    let targets = assemble_targets(&config)?;

    let probes = create_probes(&config.checks)?;
    let scanner = Scanner::new(Arc::new(SystemResolver), probes, config.timeout);
    let dispatcher = Dispatcher::new(scanner, config.concurrency);

    let format = if config.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text { color: config.color }
    };
    let reporter = Reporter::new(io::stdout(), format);

    let (summary, _) = dispatcher.run(targets, reporter).await?;
    log::info!("[main] finished: {:?}", summary);

    Ok(())
}
