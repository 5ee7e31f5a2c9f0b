#![allow(dead_code)]
use async_trait::async_trait;
use dns_relay_application::ports::{IterativeResolver, RecursiveResolver};
use dns_relay_domain::{DnsQuestion, DomainError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Answers with the target server's name after a per-server delay.
#[derive(Default)]
pub struct DelayedRecursiveResolver {
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl DelayedRecursiveResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, server: &str, delay: Duration) -> Self {
        self.delays.insert(server.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecursiveResolver for DelayedRecursiveResolver {
    async fn forward(
        &self,
        question: &DnsQuestion,
        server: &str,
    ) -> Result<Vec<String>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if server == "unreachable" {
            return Err(DomainError::TransportTimeout {
                server: server.to_string(),
            });
        }

        let delay = self.delays.get(server).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;
        Ok(vec![format!("{} via {}", question.domain, server)])
    }
}

pub struct FixedIterativeResolver {
    pub records: Vec<String>,
}

#[async_trait]
impl IterativeResolver for FixedIterativeResolver {
    async fn walk(&self, _question: &DnsQuestion) -> Vec<String> {
        self.records.clone()
    }
}
