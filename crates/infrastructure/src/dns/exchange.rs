use super::forwarding::MessageBuilder;
use super::transport::tcp::TcpTransport;
use super::transport::udp::UdpTransport;
use super::transport::DnsTransport;
use async_trait::async_trait;
use dns_relay_domain::DomainError;
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// One request/response round trip with a DNS server.
///
/// Both the forwarding resolver and the hierarchy walker talk to the
/// network exclusively through this trait so tests can substitute canned
/// replies per server address.
#[async_trait]
pub trait DnsExchange: Send + Sync {
    async fn exchange(&self, server: SocketAddr, request: &Message)
        -> Result<Message, DomainError>;
}

/// UDP exchange with a TCP retry when the reply comes back truncated.
pub struct NetworkExchange {
    timeout: Duration,
}

impl NetworkExchange {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn decode_reply(
        server: SocketAddr,
        request: &Message,
        bytes: &[u8],
    ) -> Result<Message, DomainError> {
        let reply = MessageBuilder::parse(bytes)?;

        if reply.id() != request.id() {
            return Err(DomainError::ResponseIdMismatch {
                server: server.to_string(),
                expected: request.id(),
                actual: reply.id(),
            });
        }

        Ok(reply)
    }
}

#[async_trait]
impl DnsExchange for NetworkExchange {
    async fn exchange(
        &self,
        server: SocketAddr,
        request: &Message,
    ) -> Result<Message, DomainError> {
        let bytes = MessageBuilder::serialize(request)?;

        let udp = UdpTransport::new(server).send(&bytes, self.timeout).await?;
        let reply = Self::decode_reply(server, request, &udp)?;

        if !reply.truncated() {
            return Ok(reply);
        }

        debug!(server = %server, "Truncated UDP reply, retrying over TCP");
        let tcp = TcpTransport::new(server).send(&bytes, self.timeout).await?;
        Self::decode_reply(server, request, &tcp)
    }
}
