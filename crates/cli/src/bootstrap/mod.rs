mod config;
mod errors;
mod logging;

pub use config::load_config;
pub use errors::StartupError;
pub use logging::init_logging;
