use crate::probe::Probe;
use crate::types::ProbeResult;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use reqwest::header::SERVER;
use reqwest::Client;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use url::Url;

pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_HTTPS_PORT: u16 = 443;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scheme::Http => "HTTP",
            Scheme::Https => "HTTPS",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web-service check: a single HEAD request on the configured port.
///
/// Certificate validation is disabled for HTTPS: the probe measures whether
/// a service is there, and self-signed services must still be detected.
/// Redirects are reported as-is rather than followed, and connections are
/// never pooled, so no socket outlives its request.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    scheme: Scheme,
    port: u16,
}

impl HttpProbe {
    pub fn new(scheme: Scheme, port: u16) -> Result<Self> {
        log::debug!("[scan::http] new: scheme={} port={}", scheme, port);

        let client = Client::builder()
            .user_agent(concat!("hostprobe/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .build()
            .wrap_err("Failed to create HTTP client")?;

        Ok(Self { client, scheme, port })
    }

    pub fn http(port: u16) -> Result<Self> {
        Self::new(Scheme::Http, port)
    }

    pub fn https(port: u16) -> Result<Self> {
        Self::new(Scheme::Https, port)
    }

    pub fn url(&self, address: IpAddr) -> Result<Url> {
        // SocketAddr formatting brackets IPv6 addresses
        let raw = format!("{}://{}", self.scheme, SocketAddr::new(address, self.port));
        Url::parse(&raw).wrap_err_with(|| format!("Invalid probe URL: {}", raw))
    }

    async fn head(&self, address: IpAddr, timeout: Duration) -> Result<String> {
        let url = self.url(address)?;
        let response = self.client.head(url).timeout(timeout).send().await?;

        let server = response
            .headers()
            .get(SERVER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string());

        Ok(format_detail(response.status().as_u16(), server.as_deref()))
    }
}

/// Status code, followed by the server banner when one was sent.
pub fn format_detail(status: u16, server: Option<&str>) -> String {
    match server {
        Some(server) if !server.is_empty() => format!("{} {}", status, server),
        _ => status.to_string(),
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn name(&self) -> &'static str {
        self.scheme.label()
    }

    async fn probe(&self, address: IpAddr, timeout: Duration) -> ProbeResult {
        log::debug!("[scan::http] probe: scheme={} address={} port={} timeout={}ms",
            self.scheme, address, self.port, timeout.as_millis());

        let start = Instant::now();
        // reqwest's own timeout covers the request, the outer one also covers connection setup
        match tokio::time::timeout(timeout, self.head(address, timeout)).await {
            Ok(Ok(detail)) => {
                log::debug!("[scan::http] response: scheme={} address={} detail={} duration={}ms",
                    self.scheme, address, detail, start.elapsed().as_millis());
                ProbeResult::present(self.name(), detail)
            }
            Ok(Err(e)) => {
                log::debug!("[scan::http] request_failed: scheme={} address={} error={:#}",
                    self.scheme, address, e);
                ProbeResult::absent(self.name())
            }
            Err(_) => {
                log::debug!("[scan::http] timeout: scheme={} address={} timeout={}ms",
                    self.scheme, address, timeout.as_millis());
                ProbeResult::absent(self.name())
            }
        }
    }
}
