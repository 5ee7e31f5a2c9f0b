use super::gateway::{
    normalize_endpoint, parse_body, AuthenticateRequest, AuthenticateResponse, KeepAliveRequest,
    KeepAliveResponse, LeaseGrantRequest, LeaseGrantResponse, PutRequest, StatusRequest,
    AUTHENTICATE_PATH, KV_PUT_PATH, LEASE_GRANT_PATH, LEASE_KEEPALIVE_PATH, STATUS_PATH,
};
use async_trait::async_trait;
use dns_relay_application::ports::CoordinationStore;
use dns_relay_domain::config::RegistrationConfig;
use dns_relay_domain::{DomainError, LeaseId};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

enum CallError {
    Unauthorized,
    Failed(String),
}

/// HTTP client for the etcd v3 JSON gateway with endpoint failover.
struct GatewayClient {
    http: reqwest::Client,
    endpoints: Vec<String>,
    active: AtomicUsize,
    credentials: Option<(String, String)>,
    token: RwLock<Option<String>>,
}

impl GatewayClient {
    /// `timeout` overrides the client-wide request timeout for this call.
    async fn call<B, R>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<R, String>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let start = self.active.load(Ordering::Relaxed);
        let mut last_error = "no endpoints configured".to_string();

        for attempt in 0..self.endpoints.len() {
            let index = (start + attempt) % self.endpoints.len();
            let endpoint = &self.endpoints[index];

            let mut result = self.post(endpoint, path, body, timeout).await;
            if matches!(result, Err(CallError::Unauthorized)) && self.credentials.is_some() {
                debug!(endpoint = %endpoint, "Gateway token rejected, re-authenticating");
                if let Err(e) = self.authenticate(endpoint).await {
                    last_error = e;
                    continue;
                }
                result = self.post(endpoint, path, body, timeout).await;
            }

            match result {
                Ok(text) => {
                    self.active.store(index, Ordering::Relaxed);
                    return parse_body(&text);
                }
                Err(CallError::Unauthorized) => {
                    last_error = format!("{} rejected credentials", endpoint);
                }
                Err(CallError::Failed(e)) => {
                    debug!(endpoint = %endpoint, path, error = %e, "Gateway call failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<String, CallError> {
        let mut request = self.http.post(format!("{}{}", endpoint, path)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.header("Authorization", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CallError::Failed(format!("{}: {}", endpoint, e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CallError::Unauthorized);
        }

        let text = response
            .text()
            .await
            .map_err(|e| CallError::Failed(format!("{}: {}", endpoint, e)))?;

        if !status.is_success() {
            return Err(CallError::Failed(format!(
                "{} returned HTTP {}: {}",
                endpoint,
                status.as_u16(),
                text.trim()
            )));
        }

        Ok(text)
    }

    async fn authenticate(&self, endpoint: &str) -> Result<(), String> {
        let Some((name, password)) = &self.credentials else {
            return Ok(());
        };

        *self.token.write().await = None;

        let body = AuthenticateRequest {
            name: name.as_str(),
            password: password.as_str(),
        };
        let text = match self.post(endpoint, AUTHENTICATE_PATH, &body, None).await {
            Ok(text) => text,
            Err(CallError::Unauthorized) => {
                return Err(format!("{} rejected credentials for '{}'", endpoint, name))
            }
            Err(CallError::Failed(e)) => return Err(e),
        };

        let response: AuthenticateResponse = parse_body(&text)?;
        if response.token.is_empty() {
            return Err(format!("{} returned an empty auth token", endpoint));
        }

        *self.token.write().await = Some(response.token);
        Ok(())
    }

    /// `Ok(None)` means the store no longer knows the lease.
    async fn renew(
        &self,
        lease: LeaseId,
        timeout: Option<Duration>,
    ) -> Result<Option<i64>, String> {
        let request = KeepAliveRequest {
            id: lease.0.to_string(),
        };
        let response: KeepAliveResponse = self
            .call(LEASE_KEEPALIVE_PATH, &request, timeout)
            .await?;

        Ok(response
            .result
            .map(|result| result.ttl)
            .filter(|ttl| *ttl > 0))
    }
}

/// [`CoordinationStore`] backed by an etcd cluster.
pub struct EtcdCoordinationStore {
    client: Arc<GatewayClient>,
}

impl EtcdCoordinationStore {
    /// Build the client and prove at least one endpoint answers.
    ///
    /// With credentials configured this authenticates; otherwise it asks
    /// for the member status.
    pub async fn connect(config: &RegistrationConfig) -> Result<Self, DomainError> {
        let endpoints: Vec<String> = config
            .etcd_endpoints
            .iter()
            .filter(|e| !e.trim().is_empty())
            .map(|e| normalize_endpoint(e))
            .collect();

        if endpoints.is_empty() {
            return Err(DomainError::CoordinationConnectFailed(
                "no etcd endpoints configured".to_string(),
            ));
        }

        let dial_timeout = Duration::from_secs(config.dial_timeout_secs.max(1));
        let http = reqwest::Client::builder()
            .user_agent(concat!("dns-relay/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(dial_timeout)
            .timeout(dial_timeout)
            .build()
            .map_err(|e| DomainError::CoordinationConnectFailed(e.to_string()))?;

        let credentials = config
            .credentials()
            .map(|(user, password)| (user.to_string(), password.to_string()));

        let client = GatewayClient {
            http,
            endpoints,
            active: AtomicUsize::new(0),
            credentials,
            token: RwLock::new(None),
        };

        client
            .find_reachable_endpoint()
            .await
            .map_err(DomainError::CoordinationConnectFailed)?;

        info!(
            endpoints = ?client.endpoints,
            authenticated = client.credentials.is_some(),
            "Connected to coordination store"
        );

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

impl GatewayClient {
    async fn find_reachable_endpoint(&self) -> Result<(), String> {
        let mut last_error = String::new();

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            let result = if self.credentials.is_some() {
                self.authenticate(endpoint).await
            } else {
                match self.post(endpoint, STATUS_PATH, &StatusRequest {}, None).await {
                    Ok(_) => Ok(()),
                    Err(CallError::Unauthorized) => {
                        Err(format!("{} requires authentication", endpoint))
                    }
                    Err(CallError::Failed(e)) => Err(e),
                }
            };

            match result {
                Ok(()) => {
                    self.active.store(index, Ordering::Relaxed);
                    return Ok(());
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Coordination endpoint unavailable");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl CoordinationStore for EtcdCoordinationStore {
    async fn grant_lease(&self, ttl_secs: i64) -> Result<LeaseId, DomainError> {
        let response: LeaseGrantResponse = self
            .client
            .call(LEASE_GRANT_PATH, &LeaseGrantRequest { ttl: ttl_secs }, None)
            .await
            .map_err(DomainError::LeaseGrantFailed)?;

        if !response.error.is_empty() {
            return Err(DomainError::LeaseGrantFailed(response.error));
        }
        if response.id == 0 {
            return Err(DomainError::LeaseGrantFailed(
                "gateway returned no lease id".to_string(),
            ));
        }

        debug!(lease = %LeaseId(response.id), ttl = response.ttl, "Lease granted");
        Ok(LeaseId(response.id))
    }

    async fn put_with_lease(
        &self,
        key: &str,
        value: &str,
        lease: LeaseId,
    ) -> Result<(), DomainError> {
        let _: serde_json::Value = self
            .client
            .call(KV_PUT_PATH, &PutRequest::new(key, value, lease.0), None)
            .await
            .map_err(DomainError::LeasePutFailed)?;

        debug!(key, lease = %lease, "Key written under lease");
        Ok(())
    }

    async fn keep_alive(&self, lease: LeaseId) -> Result<(), DomainError> {
        let ttl = self
            .client
            .renew(lease, None)
            .await
            .map_err(DomainError::KeepAliveFailed)?
            .ok_or_else(|| DomainError::KeepAliveFailed(format!("lease {} has expired", lease)))?;

        let period = renewal_period(ttl);
        let client = Arc::clone(&self.client);

        // Failed renewals are retried on the next tick until the lease
        // could have lapsed; an expired lease ends the task at once.
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            let mut renewed_at = Instant::now();
            let mut lease_ttl = lease_duration(ttl);

            loop {
                ticker.tick().await;
                match client.renew(lease, Some(period)).await {
                    Ok(Some(ttl)) => {
                        trace!(lease = %lease, ttl, "Lease renewed");
                        renewed_at = Instant::now();
                        lease_ttl = lease_duration(ttl);
                    }
                    Ok(None) => {
                        warn!(lease = %lease, "Lease expired, renewal stopped");
                        return;
                    }
                    Err(e) if renewed_at.elapsed() >= lease_ttl => {
                        warn!(lease = %lease, error = %e, "Lease lapsed, renewal stopped");
                        return;
                    }
                    Err(e) => {
                        debug!(lease = %lease, error = %e, "Lease renewal failed, retrying");
                    }
                }
            }
        });

        debug!(lease = %lease, period_ms = period.as_millis() as u64, "Lease renewal started");
        Ok(())
    }
}

/// One third of the TTL, never below 100ms.
fn renewal_period(ttl_secs: i64) -> Duration {
    Duration::from_millis(lease_duration(ttl_secs).as_millis() as u64 / 3)
        .max(Duration::from_millis(100))
}

fn lease_duration(ttl_secs: i64) -> Duration {
    Duration::from_secs(u64::try_from(ttl_secs).unwrap_or(0))
}
