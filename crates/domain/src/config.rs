pub mod errors;
pub mod logging;
pub mod registration;
pub mod resolver;
pub mod root;
pub mod server;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use registration::RegistrationConfig;
pub use resolver::{ResolverConfig, IANA_ROOT_SERVERS};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
