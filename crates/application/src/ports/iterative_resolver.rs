use async_trait::async_trait;
use dns_relay_domain::DnsQuestion;

#[async_trait]
pub trait IterativeResolver: Send + Sync {
    /// Resolve `question` by walking the hierarchy from the root.
    ///
    /// Failures (hop budget exhausted, no reachable nameserver) yield an
    /// empty vector.
    async fn walk(&self, question: &DnsQuestion) -> Vec<String>;
}
