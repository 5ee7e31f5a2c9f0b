use crate::bootstrap::StartupError;
use dns_relay_application::use_cases::RegisterInstanceUseCase;
use dns_relay_domain::Config;
use dns_relay_infrastructure::registration::EtcdCoordinationStore;
use dns_relay_jobs::RegistrationJob;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn build_job(config: &Config) -> Result<Option<RegistrationJob>, StartupError> {
    if !config.registration.enabled {
        info!("Registration disabled, serving queries only");
        return Ok(None);
    }

    let store = EtcdCoordinationStore::connect(&config.registration)
        .await
        .map_err(StartupError::StoreConnect)?;

    let use_case = RegisterInstanceUseCase::new(Arc::new(store), config.registration_record())
        .with_retry_delay(Duration::from_millis(config.registration.retry_delay_ms));

    Ok(Some(RegistrationJob::new(Arc::new(use_case))))
}
