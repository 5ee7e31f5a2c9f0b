use super::message_builder::MessageBuilder;
use super::renderer::MessageRenderer;
use crate::dns::exchange::DnsExchange;
use async_trait::async_trait;
use dns_relay_application::ports::RecursiveResolver;
use dns_relay_domain::{DnsQuestion, DomainError, RecordLineFilter};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::debug;

/// Forwards a question to a caller-chosen recursive server and returns the
/// rendered reply, one line per entry.
pub struct ForwardingResolver {
    exchange: Arc<dyn DnsExchange>,
    upstream_port: u16,
    line_filter: RecordLineFilter,
}

impl ForwardingResolver {
    pub fn new(exchange: Arc<dyn DnsExchange>, upstream_port: u16) -> Self {
        Self {
            exchange,
            upstream_port,
            line_filter: RecordLineFilter::default(),
        }
    }

    pub fn with_line_filter(mut self, line_filter: RecordLineFilter) -> Self {
        self.line_filter = line_filter;
        self
    }

    async fn server_address(&self, server: &str) -> Result<SocketAddr, DomainError> {
        let host = server.trim().trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(DomainError::InvalidServerAddress(
                "empty server address".to_string(),
            ));
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.upstream_port));
        }

        tokio::net::lookup_host((host, self.upstream_port))
            .await
            .map_err(|e| {
                DomainError::InvalidServerAddress(format!("Cannot resolve '{}': {}", host, e))
            })?
            .next()
            .ok_or_else(|| {
                DomainError::InvalidServerAddress(format!("No address found for '{}'", host))
            })
    }
}

#[async_trait]
impl RecursiveResolver for ForwardingResolver {
    async fn forward(
        &self,
        question: &DnsQuestion,
        server: &str,
    ) -> Result<Vec<String>, DomainError> {
        let addr = self.server_address(server).await?;
        let request = MessageBuilder::build_query(question, true)?;

        let reply = self.exchange.exchange(addr, &request).await?;
        let lines = self.line_filter.apply(&MessageRenderer::render(&reply));

        debug!(
            domain = %question.domain,
            server = %addr,
            lines = lines.len(),
            "Forwarded query answered"
        );

        Ok(lines)
    }
}
