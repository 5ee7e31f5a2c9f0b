mod register_instance;
mod status;

pub use register_instance::RegisterInstanceUseCase;
pub use status::RegistrationStatus;
