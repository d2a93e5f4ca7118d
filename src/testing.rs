use async_trait::async_trait;
use eyre::Result;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::probe::Probe;
use crate::target::{parse_literal, Resolve};
use crate::types::ProbeResult;

/// Resolver with a fixed host table. Literal addresses pass through.
#[derive(Debug, Clone, Default)]
pub struct StubResolver {
    hosts: HashMap<String, IpAddr>,
    failures: HashSet<String>,
}

impl StubResolver {
    pub fn with_host(mut self, name: &str, address: IpAddr) -> Self {
        self.hosts.insert(name.to_string(), address);
        self
    }

    pub fn with_failure(mut self, name: &str) -> Self {
        self.failures.insert(name.to_string());
        self
    }
}

#[async_trait]
impl Resolve for StubResolver {
    async fn resolve(&self, target: &str) -> Result<IpAddr> {
        if self.failures.contains(target) {
            eyre::bail!("stub resolution failure for {}", target);
        }
        if let Some(ip) = parse_literal(target) {
            return Ok(ip);
        }
        match self.hosts.get(target) {
            Some(ip) => Ok(*ip),
            None => eyre::bail!("unknown stub host {}", target),
        }
    }
}

/// Tracks how many probes are running at once and the highest value seen.
#[derive(Debug, Default)]
pub struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

type Predicate = Arc<dyn Fn(IpAddr) -> bool + Send + Sync>;

/// Probe with a canned answer, an optional delay and call accounting.
#[derive(Clone)]
pub struct StubProbe {
    name: &'static str,
    detail: String,
    present_when: Predicate,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    gauge: Arc<Gauge>,
}

impl StubProbe {
    pub fn present(name: &'static str, detail: &str) -> Self {
        Self::when(name, detail, |_| true)
    }

    pub fn absent(name: &'static str) -> Self {
        Self::when(name, "", |_| false)
    }

    pub fn when(name: &'static str, detail: &str, predicate: impl Fn(IpAddr) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name,
            detail: detail.to_string(),
            present_when: Arc::new(predicate),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            gauge: Arc::new(Gauge::default()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn gauge(&self) -> Arc<Gauge> {
        Arc::clone(&self.gauge)
    }
}

#[async_trait]
impl Probe for StubProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn probe(&self, address: IpAddr, _timeout: Duration) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gauge.enter();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.gauge.exit();

        if (self.present_when)(address) {
            ProbeResult::present(self.name, self.detail.clone())
        } else {
            ProbeResult::absent(self.name)
        }
    }
}
