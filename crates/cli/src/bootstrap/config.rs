use super::StartupError;
use dns_relay_domain::{CliOverrides, Config};

pub fn load_config(
    path: Option<&str>,
    cli_overrides: CliOverrides,
) -> Result<Config, StartupError> {
    let config = Config::load(path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}
