mod dns;
mod registration;

pub use dns::DnsServices;

use crate::bootstrap::StartupError;
use dns_relay_domain::Config;
use dns_relay_infrastructure::dns::QueryServer;
use dns_relay_jobs::RegistrationJob;

pub struct Services {
    pub query_server: QueryServer,
    pub registration: Option<RegistrationJob>,
}

impl Services {
    pub async fn build(config: &Config) -> Result<Self, StartupError> {
        let dns = DnsServices::new(config).map_err(StartupError::ConfigInvalid)?;
        let registration = registration::build_job(config).await?;

        Ok(Self {
            query_server: dns.query_server,
            registration,
        })
    }
}
