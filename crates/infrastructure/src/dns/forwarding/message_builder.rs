//! DNS Message Builder
//!
//! Constructs DNS query messages using `hickory-proto` and serializes them
//! to wire format.

use dns_relay_domain::{DnsQuestion, DomainError};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Builds DNS query messages
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a single-question query for `question`.
    ///
    /// The message gets a random ID, the question's own type and class, and
    /// the RD flag as requested.
    pub fn build_query(
        question: &DnsQuestion,
        recursion_desired: bool,
    ) -> Result<Message, DomainError> {
        let name = Self::parse_name(&question.fqdn())?;

        Ok(Self::query_for(
            name,
            RecordType::from(question.record_type),
            DNSClass::from(question.record_class),
            recursion_desired,
        ))
    }

    pub fn query_for(
        name: Name,
        record_type: RecordType,
        record_class: DNSClass,
        recursion_desired: bool,
    ) -> Message {
        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(record_type);
        query.set_query_class(record_class);

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(recursion_desired);
        message.add_query(query);
        message
    }

    pub fn parse_name(domain: &str) -> Result<Name, DomainError> {
        Name::from_str(domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }

    pub fn parse(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS message: {}", e))
        })
    }
}
