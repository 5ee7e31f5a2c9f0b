pub mod dns;
pub mod registration;

// Re-export use cases
pub use dns::ResolveEnvelopeUseCase;
pub use registration::{RegisterInstanceUseCase, RegistrationStatus};
