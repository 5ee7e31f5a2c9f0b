//! DNS Relay Domain Layer
pub mod config;
pub mod dns_question;
pub mod envelope;
pub mod errors;
pub mod line_filter;
pub mod registration;
pub mod resolution_mode;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_question::DnsQuestion;
pub use envelope::QueryEnvelope;
pub use errors::DomainError;
pub use line_filter::RecordLineFilter;
pub use registration::{LeaseId, RegistrationRecord, RegistrationState};
pub use resolution_mode::{ResolutionMode, ITERATIVE_SENTINEL};
