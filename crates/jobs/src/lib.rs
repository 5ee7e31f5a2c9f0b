pub mod registration;
pub mod runner;

pub use registration::RegistrationJob;
pub use runner::JobRunner;
