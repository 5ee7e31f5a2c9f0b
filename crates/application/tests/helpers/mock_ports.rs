#![allow(dead_code)]

use async_trait::async_trait;
use dns_relay_application::ports::{CoordinationStore, IterativeResolver, RecursiveResolver};
use dns_relay_domain::{DnsQuestion, DomainError, LeaseId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockRecursiveResolver {
    responses: Arc<Mutex<HashMap<String, Vec<String>>>>,
    failing_servers: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<(String, DnsQuestion)>>>,
}

impl MockRecursiveResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, server: &str, lines: &[&str]) {
        self.responses.lock().unwrap().insert(
            server.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
    }

    pub fn fail_for(&self, server: &str) {
        self.failing_servers.lock().unwrap().push(server.to_string());
    }

    pub fn calls(&self) -> Vec<(String, DnsQuestion)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecursiveResolver for MockRecursiveResolver {
    async fn forward(
        &self,
        question: &DnsQuestion,
        server: &str,
    ) -> Result<Vec<String>, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((server.to_string(), question.clone()));

        if self.failing_servers.lock().unwrap().iter().any(|s| s == server) {
            return Err(DomainError::TransportTimeout {
                server: server.to_string(),
            });
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(server)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Clone, Default)]
pub struct MockIterativeResolver {
    answers: Arc<Mutex<HashMap<String, Vec<String>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockIterativeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_answer(&self, domain: &str, lines: &[&str]) {
        self.answers.lock().unwrap().insert(
            domain.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IterativeResolver for MockIterativeResolver {
    async fn walk(&self, question: &DnsQuestion) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .get(question.domain.as_ref())
            .cloned()
            .unwrap_or_default()
    }
}

/// Coordination store that fails each step a configurable number of times
/// before succeeding.
#[derive(Clone, Default)]
pub struct MockCoordinationStore {
    grant_failures: Arc<AtomicUsize>,
    put_failures: Arc<AtomicUsize>,
    keep_alive_failures: Arc<AtomicUsize>,
    grant_calls: Arc<AtomicUsize>,
    put_calls: Arc<AtomicUsize>,
    keep_alive_calls: Arc<AtomicUsize>,
    next_lease: Arc<AtomicUsize>,
    puts: Arc<Mutex<Vec<(String, String, LeaseId)>>>,
    kept_alive: Arc<Mutex<Vec<LeaseId>>>,
}

impl MockCoordinationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_grants(self, times: usize) -> Self {
        self.grant_failures.store(times, Ordering::SeqCst);
        self
    }

    pub fn failing_puts(self, times: usize) -> Self {
        self.put_failures.store(times, Ordering::SeqCst);
        self
    }

    pub fn failing_keep_alives(self, times: usize) -> Self {
        self.keep_alive_failures.store(times, Ordering::SeqCst);
        self
    }

    pub fn grant_calls(&self) -> usize {
        self.grant_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn keep_alive_calls(&self) -> usize {
        self.keep_alive_calls.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> Vec<(String, String, LeaseId)> {
        self.puts.lock().unwrap().clone()
    }

    pub fn kept_alive(&self) -> Vec<LeaseId> {
        self.kept_alive.lock().unwrap().clone()
    }

    fn consume_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl CoordinationStore for MockCoordinationStore {
    async fn grant_lease(&self, _ttl_secs: i64) -> Result<LeaseId, DomainError> {
        self.grant_calls.fetch_add(1, Ordering::SeqCst);
        if Self::consume_failure(&self.grant_failures) {
            return Err(DomainError::LeaseGrantFailed("store unreachable".into()));
        }
        let id = self.next_lease.fetch_add(1, Ordering::SeqCst) as i64 + 100;
        Ok(LeaseId(id))
    }

    async fn put_with_lease(
        &self,
        key: &str,
        value: &str,
        lease: LeaseId,
    ) -> Result<(), DomainError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if Self::consume_failure(&self.put_failures) {
            return Err(DomainError::LeasePutFailed("put rejected".into()));
        }
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string(), lease));
        Ok(())
    }

    async fn keep_alive(&self, lease: LeaseId) -> Result<(), DomainError> {
        self.keep_alive_calls.fetch_add(1, Ordering::SeqCst);
        if Self::consume_failure(&self.keep_alive_failures) {
            return Err(DomainError::KeepAliveFailed("stream closed".into()));
        }
        self.kept_alive.lock().unwrap().push(lease);
        Ok(())
    }
}
