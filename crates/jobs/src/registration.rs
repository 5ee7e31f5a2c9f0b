use dns_relay_application::use_cases::{RegisterInstanceUseCase, RegistrationStatus};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs instance registration once, in the background, until it succeeds
/// or the process shuts down.
pub struct RegistrationJob {
    use_case: Arc<RegisterInstanceUseCase>,
    shutdown: CancellationToken,
}

impl RegistrationJob {
    pub fn new(use_case: Arc<RegisterInstanceUseCase>) -> Self {
        Self {
            use_case,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn status(&self) -> RegistrationStatus {
        self.use_case.status()
    }

    pub async fn start(self: Arc<Self>) {
        info!(key = %self.use_case.record().key, "Starting registration job");

        tokio::select! {
            _ = self.shutdown.cancelled() => {
                info!("RegistrationJob: shutting down");
            }
            _ = self.use_case.execute() => {
                info!("RegistrationJob: finished");
            }
        }
    }
}
