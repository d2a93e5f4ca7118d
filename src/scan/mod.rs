pub mod dns;
pub mod http;
pub mod ping;

pub use dns::DnsProbe;
pub use http::{HttpProbe, Scheme};
pub use ping::PingProbe;

use crate::config::CheckConfig;
use crate::probe::BoxedProbe;
use eyre::Result;

/// Instantiate the enabled probes, in the order they run for each target.
pub fn create_probes(checks: &CheckConfig) -> Result<Vec<BoxedProbe>> {
    let mut probes: Vec<BoxedProbe> = Vec::new();

    if checks.ping {
        probes.push(Box::new(PingProbe::default()));
    }
    if checks.dns {
        probes.push(Box::new(DnsProbe::default()));
    }
    if checks.http {
        probes.push(Box::new(HttpProbe::http(checks.http_port)?));
    }
    if checks.https {
        probes.push(Box::new(HttpProbe::https(checks.https_port)?));
    }

    log::debug!("[scan] create_probes: enabled={:?}",
        probes.iter().map(|p| p.name()).collect::<Vec<_>>());

    Ok(probes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_probes_in_order() {
        let checks = CheckConfig {
            ping: true,
            dns: true,
            http: true,
            https: true,
            ..CheckConfig::default()
        };
        let names: Vec<_> = create_probes(&checks).unwrap().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["PING", "DNS", "HTTP", "HTTPS"]);
    }

    #[test]
    fn test_only_enabled_probes() {
        let checks = CheckConfig {
            https: true,
            ..CheckConfig::default()
        };
        let names: Vec<_> = create_probes(&checks).unwrap().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["HTTPS"]);
    }
}
