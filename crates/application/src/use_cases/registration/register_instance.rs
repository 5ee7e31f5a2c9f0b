use super::RegistrationStatus;
use crate::ports::CoordinationStore;
use dns_relay_domain::{DomainError, LeaseId, RegistrationRecord, RegistrationState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Publishes this instance's registration record under a renewed lease.
///
/// States name the step in progress: `LeaseRequested` while waiting for a
/// lease, `LeasePut` while writing the key, `KeepAliveStarted` while opening
/// the renewal channel. Any failure starts a new pass from `LeaseRequested`.
/// Once `Registered` is reached the use case never runs again and does not
/// watch the renewal channel.
pub struct RegisterInstanceUseCase {
    store: Arc<dyn CoordinationStore>,
    record: RegistrationRecord,
    retry_delay: Duration,
    state: watch::Sender<RegistrationState>,
}

impl RegisterInstanceUseCase {
    pub fn new(store: Arc<dyn CoordinationStore>, record: RegistrationRecord) -> Self {
        let (state, _) = watch::channel(RegistrationState::Unregistered);
        Self {
            store,
            record,
            retry_delay: Duration::ZERO,
            state,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    pub fn status(&self) -> RegistrationStatus {
        RegistrationStatus::new(self.state.subscribe())
    }

    /// Retry registration passes until one succeeds.
    pub async fn execute(&self) {
        if self.state.borrow().is_terminal() {
            debug!(key = %self.record.key, "Instance already registered");
            return;
        }

        let mut attempt: u64 = 0;
        loop {
            attempt += 1;

            match self.register_once().await {
                Ok(lease) => {
                    self.transition(RegistrationState::Registered);
                    info!(
                        key = %self.record.key,
                        lease = %lease,
                        attempts = attempt,
                        "Instance registered"
                    );
                    return;
                }
                Err(e) => {
                    warn!(
                        key = %self.record.key,
                        attempt,
                        state = %*self.state.borrow(),
                        error = %e,
                        "Registration pass failed, retrying"
                    );
                }
            }

            if self.retry_delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }

    async fn register_once(&self) -> Result<LeaseId, DomainError> {
        self.transition(RegistrationState::LeaseRequested);
        let lease = self.store.grant_lease(self.record.lease_ttl_secs).await?;

        self.transition(RegistrationState::LeasePut);
        self.store
            .put_with_lease(&self.record.key, &self.record.value, lease)
            .await?;

        self.transition(RegistrationState::KeepAliveStarted);
        self.store.keep_alive(lease).await?;

        Ok(lease)
    }

    fn transition(&self, next: RegistrationState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!(from = %previous, to = %next, "Registration state changed");
        }
    }
}
