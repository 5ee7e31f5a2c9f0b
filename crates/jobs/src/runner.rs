use crate::RegistrationJob;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + Sync + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> JoinHandle<()>;
}

impl SpawnableJob for RegistrationJob {
    fn with_cancellation(self, token: CancellationToken) -> Self {
        self.with_cancellation(token)
    }

    fn start_job(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.start().await })
    }
}

fn spawn_job<J: SpawnableJob>(
    job: Option<J>,
    shutdown: &Option<CancellationToken>,
) -> Option<JoinHandle<()>> {
    let job = job?;
    let job = match shutdown {
        Some(token) => job.with_cancellation(token.clone()),
        None => job,
    };
    Some(Arc::new(job).start_job())
}

pub struct JobRunner {
    registration: Option<RegistrationJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            registration: None,
            shutdown: None,
        }
    }

    pub fn with_registration(mut self, job: RegistrationJob) -> Self {
        self.registration = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Spawns every configured job and returns their handles.
    pub async fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");

        let handles: Vec<JoinHandle<()>> = [spawn_job(self.registration, &self.shutdown)]
            .into_iter()
            .flatten()
            .collect();

        info!(jobs = handles.len(), "All background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
