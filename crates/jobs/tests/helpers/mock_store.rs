use async_trait::async_trait;
use dns_relay_application::ports::CoordinationStore;
use dns_relay_domain::{DomainError, LeaseId};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fails the first `failures` lease grants, then behaves.
pub struct FlakyStore {
    failures: AtomicUsize,
    grants: AtomicUsize,
    keep_alives: AtomicUsize,
}

impl FlakyStore {
    pub fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            grants: AtomicUsize::new(0),
            keep_alives: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self::failing(usize::MAX)
    }

    pub fn grant_calls(&self) -> usize {
        self.grants.load(Ordering::SeqCst)
    }

    pub fn keep_alive_calls(&self) -> usize {
        self.keep_alives.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoordinationStore for FlakyStore {
    async fn grant_lease(&self, _ttl_secs: i64) -> Result<LeaseId, DomainError> {
        self.grants.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(DomainError::LeaseGrantFailed("connection refused".into()));
        }
        Ok(LeaseId(1))
    }

    async fn put_with_lease(&self, _key: &str, _value: &str, _lease: LeaseId) -> Result<(), DomainError> {
        Ok(())
    }

    async fn keep_alive(&self, _lease: LeaseId) -> Result<(), DomainError> {
        self.keep_alives.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
