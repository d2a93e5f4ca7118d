use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "hostprobe")]
#[command(about = "Probe address ranges and host lists for reachability, DNS and web services")]
pub struct Cli {
    /// Enable ping check
    #[arg(long)]
    pub ping: bool,

    /// Enable DNS check
    #[arg(long)]
    pub dns: bool,

    /// Enable HTTP check
    #[arg(long)]
    pub http: bool,

    /// Enable HTTPS check
    #[arg(long)]
    pub https: bool,

    /// Enable all checks
    #[arg(long)]
    pub all: bool,

    /// CIDR range to scan
    #[arg(short, long)]
    pub cidr: Option<String>,

    /// File containing hostnames or IPs, one per line
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Timeout in seconds for each network operation
    #[arg(short, long, default_value = "5")]
    pub timeout: u64,

    /// Maximum number of targets scanned concurrently
    #[arg(short = 'm', long, default_value = "50")]
    pub max_concurrency: usize,

    /// Port for the web check (used with exactly one of --http or --https)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Emit result lines as JSON objects
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write logs to this file instead of the default location
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
