use async_trait::async_trait;
use dns_relay_domain::{DomainError, LeaseId};

/// Lease-based key/value store used to advertise instance liveness.
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    async fn grant_lease(&self, ttl_secs: i64) -> Result<LeaseId, DomainError>;

    async fn put_with_lease(
        &self,
        key: &str,
        value: &str,
        lease: LeaseId,
    ) -> Result<(), DomainError>;

    /// Open the renewal channel for `lease`. Returns once renewal is
    /// running; the channel keeps renewing on its own afterwards.
    async fn keep_alive(&self, lease: LeaseId) -> Result<(), DomainError>;
}
