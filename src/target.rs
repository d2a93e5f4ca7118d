use async_trait::async_trait;
use eyre::{Result, WrapErr};
use std::net::IpAddr;
use tokio::net::lookup_host;

/// Maps a textual target (literal address or hostname) to one usable address.
#[async_trait]
pub trait Resolve {
    async fn resolve(&self, target: &str) -> Result<IpAddr>;
}

pub type SharedResolver = std::sync::Arc<dyn Resolve + Send + Sync>;

/// Resolver backed by the operating system's name lookup.
///
/// Literal addresses are returned without any I/O. Every call performs a
/// fresh lookup; nothing is cached between targets.
#[derive(Debug, Clone, Default)]
pub struct SystemResolver;

#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve(&self, target: &str) -> Result<IpAddr> {
        if let Some(ip) = parse_literal(target) {
            log::trace!("[target] literal_address: target={}", target);
            return Ok(ip);
        }

        log::debug!("[target] resolve: target={}", target);

        // Port is irrelevant here, lookup_host just needs a socket address shape
        let mut addresses = lookup_host((target, 0u16))
            .await
            .wrap_err_with(|| format!("DNS resolution failed for {}", target))?;

        match addresses.next() {
            Some(addr) => {
                log::debug!("[target] resolved: target={} address={}", target, addr.ip());
                Ok(addr.ip())
            }
            None => eyre::bail!("No IP addresses found for target: {}", target),
        }
    }
}

/// Parse a literal IPv4/IPv6 address exactly as given. Anything else,
/// including bracketed IPv6, is left to the system lookup.
pub fn parse_literal(target: &str) -> Option<IpAddr> {
    target.parse::<IpAddr>().ok()
}
