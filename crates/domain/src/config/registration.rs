use crate::registration::DEFAULT_LEASE_TTL_SECS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub zone_name: String,

    #[serde(default)]
    pub line_name: String,

    #[serde(default)]
    pub etcd_endpoints: Vec<String>,

    #[serde(default)]
    pub etcd_user: Option<String>,

    #[serde(default)]
    pub etcd_password: Option<String>,

    #[serde(default = "default_lease_ttl_secs")]
    pub lease_ttl_secs: i64,

    #[serde(default = "default_dial_timeout_secs")]
    pub dial_timeout_secs: u64,

    /// Pause between failed registration passes. Zero retries immediately.
    #[serde(default)]
    pub retry_delay_ms: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            zone_name: String::new(),
            line_name: String::new(),
            etcd_endpoints: Vec::new(),
            etcd_user: None,
            etcd_password: None,
            lease_ttl_secs: default_lease_ttl_secs(),
            dial_timeout_secs: default_dial_timeout_secs(),
            retry_delay_ms: 0,
        }
    }
}

impl RegistrationConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.etcd_user, &self.etcd_password) {
            (Some(user), Some(password)) if !user.is_empty() => Some((user, password)),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_lease_ttl_secs() -> i64 {
    DEFAULT_LEASE_TTL_SECS
}

fn default_dial_timeout_secs() -> u64 {
    10
}
