use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid server address: {0}")]
    InvalidServerAddress(String),

    #[error("Invalid return port: {0}")]
    InvalidReturnPort(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Response ID mismatch from {server}: expected {expected}, got {actual}")]
    ResponseIdMismatch {
        server: String,
        expected: u16,
        actual: u16,
    },

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    TransportError { server: String, reason: String },

    #[error("Hop budget of {0} exhausted")]
    HopBudgetExhausted(usize),

    #[error("No reachable nameserver for {0}")]
    NoReachableNameserver(String),

    #[error("Coordination store connect failed: {0}")]
    CoordinationConnectFailed(String),

    #[error("Lease grant failed: {0}")]
    LeaseGrantFailed(String),

    #[error("Lease put failed: {0}")]
    LeasePutFailed(String),

    #[error("Lease keep-alive failed: {0}")]
    KeepAliveFailed(String),
}

impl DomainError {
    pub fn transport(server: impl ToString, reason: impl ToString) -> Self {
        Self::TransportError {
            server: server.to_string(),
            reason: reason.to_string(),
        }
    }
}
