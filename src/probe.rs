use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

use crate::types::ProbeResult;

/// A single check that reports whether a service answers on an address.
///
/// Implementations never return errors: any failure (timeout, refusal,
/// protocol or TLS error) is folded into `present = false`.
#[async_trait]
pub trait Probe {
    /// Label shown in result lines (e.g. "HTTP")
    fn name(&self) -> &'static str;

    /// Perform exactly one network interaction bounded by `timeout`
    async fn probe(&self, address: IpAddr, timeout: Duration) -> ProbeResult;
}

pub type BoxedProbe = Box<dyn Probe + Send + Sync>;
