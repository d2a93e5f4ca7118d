pub mod cli;
pub mod config;
pub mod dispatch;
pub mod input;
pub mod logging;
pub mod pretty;
pub mod probe;
pub mod report;
pub mod scan;
pub mod scanner;
pub mod target;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types and functions at the crate root
pub use config::{CheckConfig, ScanConfig};
pub use dispatch::Dispatcher;
pub use logging::{get_log_file_path, init_logging};
pub use probe::{BoxedProbe, Probe};
pub use report::{OutputFormat, Report, Reporter};
pub use scan::create_probes;
pub use scanner::Scanner;
pub use target::{Resolve, SystemResolver};
pub use types::{ProbeResult, RunSummary, ScanOutcome};
