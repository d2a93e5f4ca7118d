use eyre::{Result, WrapErr};
use ipnetwork::IpNetwork;
use std::fs;
use std::path::Path;

use crate::config::ScanConfig;

// A /8 for IPv4; larger ranges are almost certainly a typo
const MAX_HOST_BITS: u8 = 24;

/// Every address in a CIDR range, in ascending order, network and broadcast
/// addresses included.
pub fn expand_cidr(cidr: &str) -> Result<Vec<String>> {
    let network: IpNetwork = cidr
        .trim()
        .parse()
        .wrap_err_with(|| format!("Invalid CIDR range: {}", cidr))?;

    let max_prefix = match network {
        IpNetwork::V4(_) => 32,
        IpNetwork::V6(_) => 128,
    };
    let host_bits = max_prefix - network.prefix();
    if host_bits > MAX_HOST_BITS {
        eyre::bail!("CIDR range {} is too large (at most /{} allowed)", cidr, max_prefix - MAX_HOST_BITS);
    }

    let targets: Vec<String> = match network {
        IpNetwork::V4(net) => net.iter().map(|ip| ip.to_string()).collect(),
        IpNetwork::V6(net) => net.iter().map(|ip| ip.to_string()).collect(),
    };
    log::debug!("[input] expand_cidr: cidr={} count={}", cidr, targets.len());
    Ok(targets)
}

/// One target per line; surrounding whitespace is trimmed and blank lines are skipped.
pub fn read_targets_file(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read target file: {}", path.display()))?;
    let targets = parse_targets(&contents);
    log::debug!("[input] read_targets_file: path={} count={}", path.display(), targets.len());
    Ok(targets)
}

pub fn parse_targets(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Range targets first, then file targets. Duplicates are kept.
pub fn assemble_targets(config: &ScanConfig) -> Result<Vec<String>> {
    let mut targets = Vec::new();
    if let Some(cidr) = &config.cidr {
        targets.extend(expand_cidr(cidr)?);
    }
    if let Some(file) = &config.file {
        targets.extend(read_targets_file(file)?);
    }
    log::info!("[input] assembled: targets={}", targets.len());
    Ok(targets)
}
