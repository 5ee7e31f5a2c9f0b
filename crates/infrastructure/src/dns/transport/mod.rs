pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use dns_relay_domain::DomainError;
use std::time::Duration;

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError>;
}
