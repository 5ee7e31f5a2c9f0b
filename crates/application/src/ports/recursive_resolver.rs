use async_trait::async_trait;
use dns_relay_domain::{DnsQuestion, DomainError};

#[async_trait]
pub trait RecursiveResolver: Send + Sync {
    /// Forward `question` to `server` with recursion desired and return the
    /// reply rendered as text lines.
    ///
    /// A single exchange is attempted. Any transport or parse failure is
    /// returned as an error; no partial answer is produced.
    async fn forward(&self, question: &DnsQuestion, server: &str)
        -> Result<Vec<String>, DomainError>;
}
