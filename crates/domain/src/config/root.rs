use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::registration::RegistrationConfig;
use super::resolver::ResolverConfig;
use super::server::ServerConfig;
use crate::RegistrationRecord;

const LOCAL_CONFIG_PATH: &str = "dns-relay.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dns-relay/config.toml";

/// Main configuration structure for the DNS relay
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Query listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream and iterative resolution configuration
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Coordination store registration
    #[serde(default)]
    pub registration: RegistrationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-relay.toml in current directory
    /// 3. /etc/dns-relay/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.listening_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listening_port == 0 {
            return Err(ConfigError::Validation(
                "Listening port cannot be 0".to_string(),
            ));
        }

        if self.server.max_in_flight == 0 {
            return Err(ConfigError::Validation(
                "max_in_flight must be greater than 0".to_string(),
            ));
        }

        if self.resolver.root_servers.is_empty() {
            return Err(ConfigError::Validation(
                "No root servers configured".to_string(),
            ));
        }
        self.resolver.root_server_addrs()?;

        if self.resolver.iterative_max_hops == 0 {
            return Err(ConfigError::Validation(
                "iterative_max_hops must be greater than 0".to_string(),
            ));
        }

        if self.resolver.nameserver_cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "nameserver_cache_capacity must be greater than 0".to_string(),
            ));
        }

        let registration = &self.registration;
        if registration.enabled {
            if registration.zone_name.is_empty() || registration.line_name.is_empty() {
                return Err(ConfigError::Validation(
                    "Registration requires zone_name and line_name".to_string(),
                ));
            }
            if registration.etcd_endpoints.is_empty() {
                return Err(ConfigError::Validation(
                    "Registration requires at least one etcd endpoint".to_string(),
                ));
            }
            if registration.lease_ttl_secs <= 0 {
                return Err(ConfigError::Validation(
                    "lease_ttl_secs must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The record this instance publishes under its lease.
    pub fn registration_record(&self) -> RegistrationRecord {
        RegistrationRecord::for_instance(
            &self.registration.zone_name,
            &self.registration.line_name,
            &self.server.listening_address,
            self.server.listening_port,
        )
        .with_lease_ttl(self.registration.lease_ttl_secs)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}
