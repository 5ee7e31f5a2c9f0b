use dns_relay_domain::RegistrationState;
use tokio::sync::watch;

/// Read side of the registration state machine, for health checks.
#[derive(Debug, Clone)]
pub struct RegistrationStatus {
    rx: watch::Receiver<RegistrationState>,
}

impl RegistrationStatus {
    pub(crate) fn new(rx: watch::Receiver<RegistrationState>) -> Self {
        Self { rx }
    }

    pub fn current(&self) -> RegistrationState {
        *self.rx.borrow()
    }

    pub fn is_registered(&self) -> bool {
        self.current().is_terminal()
    }

    /// Resolves once the instance is registered. Never resolves if the
    /// registration use case is dropped before reaching that state.
    pub async fn wait_registered(&mut self) {
        if self.rx.wait_for(|state| state.is_terminal()).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
