use super::DomainError;

/// A DNS question travelling between a caller and the relay, plus the
/// answer lines once a resolver has filled them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEnvelope {
    pub domain: String,
    pub record_type: u32,
    pub record_class: u32,
    pub target_server: String,
    pub return_port: String,
    pub records: Vec<String>,
}

impl QueryEnvelope {
    pub fn new(
        domain: impl Into<String>,
        record_type: u32,
        record_class: u32,
        target_server: impl Into<String>,
        return_port: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            record_class,
            target_server: target_server.into(),
            return_port: return_port.into(),
            records: Vec::new(),
        }
    }

    pub fn return_port_number(&self) -> Result<u16, DomainError> {
        let trimmed = self.return_port.trim();
        match trimmed.parse::<u16>() {
            Ok(0) | Err(_) => Err(DomainError::InvalidReturnPort(self.return_port.clone())),
            Ok(port) => Ok(port),
        }
    }

    /// Consumes the envelope and returns it with `records` replaced.
    pub fn answered(mut self, records: Vec<String>) -> Self {
        self.records = records;
        self
    }
}
