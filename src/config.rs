use eyre::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::scan::http::{DEFAULT_HTTP_PORT, DEFAULT_HTTPS_PORT};

const MAX_CONCURRENCY: usize = u16::MAX as usize;

/// Which probes run, and where the web probes connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckConfig {
    pub ping: bool,
    pub dns: bool,
    pub http: bool,
    pub https: bool,
    pub http_port: u16,
    pub https_port: u16,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            ping: false,
            dns: false,
            http: false,
            https: false,
            http_port: DEFAULT_HTTP_PORT,
            https_port: DEFAULT_HTTPS_PORT,
        }
    }
}

impl CheckConfig {
    pub fn any_enabled(&self) -> bool {
        self.ping || self.dns || self.http || self.https
    }

    /// Build the check set from the individual flags.
    ///
    /// An explicit port applies to the single web protocol that was selected
    /// by name. Naming both with a port is ambiguous and rejected; `--all`
    /// alone keeps the default ports.
    pub fn from_flags(ping: bool, dns: bool, http: bool, https: bool, all: bool, port: Option<u16>) -> Result<Self> {
        let mut checks = Self {
            ping: all || ping,
            dns: all || dns,
            http: all || http,
            https: all || https,
            ..Self::default()
        };

        if let Some(port) = port {
            if port == 0 {
                eyre::bail!("Port must be between 1 and 65535");
            }
            match (http, https) {
                (true, true) => eyre::bail!(
                    "Port {} is ambiguous with both --http and --https; select one web check", port
                ),
                (true, false) => checks.http_port = port,
                (false, true) => checks.https_port = port,
                (false, false) => {
                    log::warn!("[config] port_ignored: port={} reason=no --http or --https flag", port);
                }
            }
        }

        if !checks.any_enabled() {
            eyre::bail!("No checks selected; use --ping, --dns, --http, --https or --all");
        }

        Ok(checks)
    }
}

/// Immutable settings for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub checks: CheckConfig,
    pub timeout: Duration,
    pub concurrency: usize,
    pub cidr: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub color: bool,
}

impl ScanConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.cidr.is_none() && cli.file.is_none() {
            eyre::bail!("You must specify -c (CIDR) or -f (file)");
        }

        let checks = CheckConfig::from_flags(cli.ping, cli.dns, cli.http, cli.https, cli.all, cli.port)?;

        if cli.timeout == 0 {
            eyre::bail!("Timeout must be at least 1 second");
        }
        if cli.max_concurrency == 0 || cli.max_concurrency > MAX_CONCURRENCY {
            eyre::bail!("Max concurrency must be between 1 and {}", MAX_CONCURRENCY);
        }

        let config = Self {
            checks,
            timeout: Duration::from_secs(cli.timeout),
            concurrency: cli.max_concurrency,
            cidr: cli.cidr.clone(),
            file: cli.file.clone(),
            json: cli.json,
            color: !cli.no_color,
        };

        log::info!("[config] loaded: checks={:?} timeout={}s concurrency={}",
            config.checks, cli.timeout, config.concurrency);

        Ok(config)
    }
}
