use crate::probe::Probe;
use crate::types::ProbeResult;
use async_trait::async_trait;
use std::net::IpAddr;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

const PING_PACKET_COUNT: u8 = 1;
const MIN_WAIT_SECS: u64 = 1;

/// Reachability check: one echo request through the system `ping` utility.
#[derive(Debug, Clone)]
pub struct PingProbe {
    program: String,
}

impl PingProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(&self, address: IpAddr, timeout: Duration) -> Vec<String> {
        vec![
            "-c".to_string(),
            PING_PACKET_COUNT.to_string(),
            "-W".to_string(),
            wait_arg(timeout),
            address.to_string(),
        ]
    }
}

impl Default for PingProbe {
    fn default() -> Self {
        Self::new("ping")
    }
}

/// `-W` is milliseconds on macOS and whole seconds elsewhere.
fn wait_arg(timeout: Duration) -> String {
    if cfg!(target_os = "macos") {
        timeout.as_millis().to_string()
    } else {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        secs.max(MIN_WAIT_SECS).to_string()
    }
}

#[async_trait]
impl Probe for PingProbe {
    fn name(&self) -> &'static str {
        "PING"
    }

    async fn probe(&self, address: IpAddr, timeout: Duration) -> ProbeResult {
        log::debug!("[scan::ping] probe: address={} timeout={}ms", address, timeout.as_millis());

        let start = Instant::now();
        let mut command = Command::new(&self.program);
        command
            .args(self.args(address, timeout))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(timeout, command.status()).await {
            Ok(Ok(status)) if status.success() => {
                log::debug!("[scan::ping] reply: address={} duration={}ms",
                    address, start.elapsed().as_millis());
                ProbeResult::present(self.name(), "")
            }
            Ok(Ok(status)) => {
                log::debug!("[scan::ping] no_reply: address={} status={}", address, status);
                ProbeResult::absent(self.name())
            }
            Ok(Err(e)) => {
                log::warn!("[scan::ping] command_failed: program={} error={}", self.program, e);
                ProbeResult::absent(self.name())
            }
            Err(_) => {
                log::debug!("[scan::ping] timeout: address={} timeout={}ms",
                    address, timeout.as_millis());
                ProbeResult::absent(self.name())
            }
        }
    }
}
