use super::{DomainError, QueryEnvelope};
use std::sync::Arc;

/// A single DNS question as the resolvers see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub domain: Arc<str>,
    pub record_type: u16,
    pub record_class: u16,
}

impl DnsQuestion {
    pub fn new(domain: impl Into<Arc<str>>, record_type: u16, record_class: u16) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            record_class,
        }
    }

    /// Domain with a trailing dot, as the hierarchy walk expects.
    pub fn fqdn(&self) -> String {
        if self.domain.ends_with('.') {
            self.domain.to_string()
        } else {
            format!("{}.", self.domain)
        }
    }
}

impl TryFrom<&QueryEnvelope> for DnsQuestion {
    type Error = DomainError;

    fn try_from(envelope: &QueryEnvelope) -> Result<Self, Self::Error> {
        let record_type = u16::try_from(envelope.record_type).map_err(|_| {
            DomainError::InvalidEnvelope(format!(
                "record type {} out of range",
                envelope.record_type
            ))
        })?;
        let record_class = u16::try_from(envelope.record_class).map_err(|_| {
            DomainError::InvalidEnvelope(format!(
                "record class {} out of range",
                envelope.record_class
            ))
        })?;

        Ok(Self::new(envelope.domain.as_str(), record_type, record_class))
    }
}
