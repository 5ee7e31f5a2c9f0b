use dns_relay_domain::{ConfigError, DomainError};
use thiserror::Error;

/// Fatal bootstrap failures. Each stage exits with its own status.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot read configuration: {0}")]
    ConfigRead(ConfigError),

    #[error("cannot parse configuration: {0}")]
    ConfigParse(ConfigError),

    #[error("cannot connect to coordination store: {0}")]
    StoreConnect(DomainError),

    #[error("invalid configuration: {0}")]
    ConfigInvalid(ConfigError),

    #[error("cannot bind query listener: {0:#}")]
    Bind(anyhow::Error),
}

impl StartupError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigRead(_) => 1,
            Self::ConfigParse(_) => 2,
            Self::StoreConnect(_) => 3,
            Self::ConfigInvalid(_) => 4,
            Self::Bind(_) => 5,
        }
    }
}

impl From<ConfigError> for StartupError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::FileRead(..) => Self::ConfigRead(e),
            ConfigError::Parse(_) => Self::ConfigParse(e),
            ConfigError::Validation(_) => Self::ConfigInvalid(e),
        }
    }
}
