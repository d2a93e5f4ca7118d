use std::time::{Duration, Instant};

use crate::probe::BoxedProbe;
use crate::target::SharedResolver;
use crate::types::ScanOutcome;

/// Runs the full check sequence for one target: resolve, probe, assemble.
pub struct Scanner {
    resolver: SharedResolver,
    probes: Vec<BoxedProbe>,
    timeout: Duration,
}

impl Scanner {
    pub fn new(resolver: SharedResolver, probes: Vec<BoxedProbe>, timeout: Duration) -> Self {
        log::debug!("[scanner] new: probes={} timeout={}ms", probes.len(), timeout.as_millis());
        Self {
            resolver,
            probes,
            timeout,
        }
    }

    pub fn probe_names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Scan a single target. Never fails: resolution errors become the
    /// `Unresolved` outcome and probe failures are dropped from the results.
    pub async fn scan(&self, target: &str) -> ScanOutcome {
        let scan_start = Instant::now();

        let address = match self.resolver.resolve(target).await {
            Ok(address) => address,
            Err(e) => {
                log::debug!("[scanner] resolution_failed: target={} error={:#}", target, e);
                return ScanOutcome::Unresolved {
                    target: target.to_string(),
                };
            }
        };

        // Probes are independent; running them in sequence keeps per-target load low
        let mut results = Vec::new();
        for probe in &self.probes {
            let result = probe.probe(address, self.timeout).await;
            log::trace!("[scanner] probe_completed: target={} probe={} present={}",
                target, result.name, result.present);
            if result.present {
                results.push(result);
            }
        }

        log::debug!("[scanner] scan_completed: target={} address={} found={} duration={}ms",
            target, address, results.len(), scan_start.elapsed().as_millis());

        ScanOutcome::Scanned {
            target: target.to_string(),
            address,
            results,
        }
    }
}
