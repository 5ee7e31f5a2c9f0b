use std::fmt;

pub const REGISTRATION_KEY_PREFIX: &str = "/line/dns";
pub const ONLINE_MARKER: &str = "online";
pub const DEFAULT_LEASE_TTL_SECS: i64 = 5;

/// Lease handle issued by the coordination store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaseId(pub i64);

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// The liveness key this instance publishes for the routing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub key: String,
    pub value: String,
    pub lease_ttl_secs: i64,
}

impl RegistrationRecord {
    pub fn for_instance(zone: &str, line: &str, address: &str, port: u16) -> Self {
        Self {
            key: format!(
                "{}/{}/{}/{}:{}",
                REGISTRATION_KEY_PREFIX, zone, line, address, port
            ),
            value: ONLINE_MARKER.to_string(),
            lease_ttl_secs: DEFAULT_LEASE_TTL_SECS,
        }
    }

    pub fn with_lease_ttl(mut self, ttl_secs: i64) -> Self {
        self.lease_ttl_secs = ttl_secs;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationState {
    #[default]
    Unregistered,
    LeaseRequested,
    LeasePut,
    KeepAliveStarted,
    Registered,
}

impl RegistrationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Registered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::LeaseRequested => "lease_requested",
            Self::LeasePut => "lease_put",
            Self::KeepAliveStarted => "keepalive_started",
            Self::Registered => "registered",
        }
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
