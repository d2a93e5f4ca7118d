use crate::probe::Probe;
use crate::types::ProbeResult;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use hickory_proto::serialize::binary::BinEncodable;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;

pub const DNS_PORT: u16 = 53;
const QUERY_DOMAIN: &str = "google.com.";
const MAX_DNS_DATAGRAM: usize = 4096;

static NEXT_QUERY_ID: AtomicU16 = AtomicU16::new(0x5a17);

/// Name-resolution check: treats the target as a resolver and asks it for a
/// well-known name. Any reply counts, including NXDOMAIN and SERVFAIL, since
/// the check is about a DNS service answering at all.
#[derive(Debug, Clone)]
pub struct DnsProbe {
    port: u16,
}

impl DnsProbe {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    async fn exchange(&self, address: IpAddr) -> Result<Message> {
        let id = NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed);
        let query = build_query(id)?;

        let bind_addr = match address {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(bind_addr).await.wrap_err("Failed to bind UDP socket")?;
        socket
            .connect(SocketAddr::new(address, self.port))
            .await
            .wrap_err("Failed to connect UDP socket")?;
        socket.send(&query).await.wrap_err("Failed to send DNS query")?;

        let mut buf = vec![0u8; MAX_DNS_DATAGRAM];
        loop {
            let n = socket.recv(&mut buf).await.wrap_err("Failed to receive DNS reply")?;
            match Message::from_vec(&buf[..n]) {
                Ok(reply) if reply.id() == id && reply.message_type() == MessageType::Response => {
                    return Ok(reply);
                }
                Ok(reply) => {
                    log::trace!("[scan::dns] unrelated_datagram: address={} id={}", address, reply.id());
                }
                Err(e) => {
                    log::trace!("[scan::dns] malformed_datagram: address={} len={} error={}", address, n, e);
                }
            }
        }
    }
}

impl Default for DnsProbe {
    fn default() -> Self {
        Self::new(DNS_PORT)
    }
}

fn build_query(id: u16) -> Result<Vec<u8>> {
    let name = Name::from_ascii(QUERY_DOMAIN).wrap_err("Invalid query domain")?;
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, RecordType::A));
    message.to_vec().wrap_err("Failed to encode DNS query")
}

#[async_trait]
impl Probe for DnsProbe {
    fn name(&self) -> &'static str {
        "DNS"
    }

    async fn probe(&self, address: IpAddr, timeout: Duration) -> ProbeResult {
        log::debug!("[scan::dns] probe: address={} port={} timeout={}ms",
            address, self.port, timeout.as_millis());

        let start = Instant::now();
        match tokio::time::timeout(timeout, self.exchange(address)).await {
            Ok(Ok(reply)) => {
                log::debug!("[scan::dns] reply: address={} rcode={} answers={} duration={}ms",
                    address, reply.response_code(), reply.answers().len(), start.elapsed().as_millis());
                ProbeResult::present(self.name(), "")
            }
            Ok(Err(e)) => {
                log::debug!("[scan::dns] exchange_failed: address={} error={:#}", address, e);
                ProbeResult::absent(self.name())
            }
            Err(_) => {
                log::debug!("[scan::dns] timeout: address={} timeout={}ms", address, timeout.as_millis());
                ProbeResult::absent(self.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::ResponseCode;

    async fn spawn_responder(reply: impl Fn(Message) -> Vec<u8> + Send + 'static) -> u16 {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut buf = vec![0u8; MAX_DNS_DATAGRAM];
            while let Ok((n, peer)) = socket.recv_from(&mut buf).await {
                let query = Message::from_vec(&buf[..n]).unwrap();
                let _ = socket.send_to(&reply(query), peer).await;
            }
        });
        port
    }

    #[test]
    fn test_build_query() {
        let bytes = build_query(4242).unwrap();
        let message = Message::from_vec(&bytes).unwrap();
        assert_eq!(message.id(), 4242);
        assert_eq!(message.message_type(), MessageType::Query);
        assert!(message.recursion_desired());
        assert_eq!(message.queries().len(), 1);
        assert_eq!(message.queries()[0].query_type(), RecordType::A);
        assert_eq!(message.queries()[0].name().to_ascii(), QUERY_DOMAIN);
    }

    #[tokio::test]
    async fn test_negative_reply_is_present() {
        let port = spawn_responder(|query| {
            Message::error_msg(query.id(), query.op_code(), ResponseCode::NXDomain)
                .to_vec()
                .unwrap()
        })
        .await;

        let result = DnsProbe::new(port)
            .probe(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_secs(2))
            .await;
        assert_eq!(result.name, "DNS");
        assert!(result.present);
        assert!(result.detail.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_reply_is_absent() {
        let port = spawn_responder(|_| b"not dns".to_vec()).await;

        let result = DnsProbe::new(port)
            .probe(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_millis(300))
            .await;
        assert!(!result.present);
    }

    #[tokio::test]
    async fn test_mismatched_id_is_absent() {
        let port = spawn_responder(|query| {
            Message::error_msg(query.id().wrapping_add(1), query.op_code(), ResponseCode::NoError)
                .to_vec()
                .unwrap()
        })
        .await;

        let result = DnsProbe::new(port)
            .probe(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_millis(300))
            .await;
        assert!(!result.present);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Bound but never read from
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();

        let start = Instant::now();
        let result = DnsProbe::new(port)
            .probe(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_millis(200))
            .await;
        assert!(!result.present);
        assert!(start.elapsed() < Duration::from_secs(2));
        drop(socket);
    }
}
