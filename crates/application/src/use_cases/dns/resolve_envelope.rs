use crate::ports::{IterativeResolver, RecursiveResolver};
use dns_relay_domain::{DnsQuestion, DomainError, QueryEnvelope, ResolutionMode};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub struct ResolveEnvelopeUseCase {
    recursive: Arc<dyn RecursiveResolver>,
    iterative: Arc<dyn IterativeResolver>,
}

impl ResolveEnvelopeUseCase {
    pub fn new(recursive: Arc<dyn RecursiveResolver>, iterative: Arc<dyn IterativeResolver>) -> Self {
        Self {
            recursive,
            iterative,
        }
    }

    /// Run exactly one resolution strategy and return the envelope with its
    /// records filled in.
    ///
    /// Recursive failures are returned as errors so the caller drops the
    /// envelope. Iterative failures come back as an envelope with no
    /// records.
    pub async fn execute(&self, envelope: QueryEnvelope) -> Result<QueryEnvelope, DomainError> {
        let start = Instant::now();
        let question = DnsQuestion::try_from(&envelope)?;
        let mode = ResolutionMode::select(&envelope.target_server);

        let records = match &mode {
            ResolutionMode::Iterative => self.iterative.walk(&question).await,
            ResolutionMode::Recursive { server } => {
                self.recursive.forward(&question, server).await?
            }
        };

        debug!(
            domain = %question.domain,
            record_type = question.record_type,
            mode = mode.as_str(),
            records = records.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Envelope resolved"
        );

        Ok(envelope.answered(records))
    }
}
