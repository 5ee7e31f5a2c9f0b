//! UDP transport (RFC 1035 §4.2.1). Datagrams carry no framing; a reply
//! with TC set is the caller's cue to retry over TCP.

use super::DnsTransport;
use async_trait::async_trait;
use dns_relay_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Largest reply accepted from an upstream, matching a 4096-byte EDNS(0)
/// payload.
const MAX_REPLY_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn local_addr(&self) -> SocketAddr {
        match self.server_addr {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        }
    }

    fn timed_out(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let deadline = Instant::now() + timeout;
        let socket = UdpSocket::bind(self.local_addr())
            .await
            .map_err(|e| DomainError::transport(self.server_addr, e))?;

        tokio::time::timeout_at(deadline, socket.send_to(message_bytes, self.server_addr))
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| DomainError::transport(self.server_addr, e))?;

        let mut buf = vec![0u8; MAX_REPLY_SIZE];
        loop {
            let (len, from) = tokio::time::timeout_at(deadline, socket.recv_from(&mut buf))
                .await
                .map_err(|_| self.timed_out())?
                .map_err(|e| DomainError::transport(self.server_addr, e))?;

            // Stray datagrams do not end the wait.
            if from != self.server_addr {
                trace!(expected = %self.server_addr, from = %from, "Ignoring stray UDP datagram");
                continue;
            }

            buf.truncate(len);
            debug!(server = %self.server_addr, bytes = len, "UDP reply received");

            return Ok(buf);
        }
    }
}
