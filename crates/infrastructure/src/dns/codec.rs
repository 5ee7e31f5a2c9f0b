//! Binary framing of query envelopes.
//!
//! Envelopes travel as one Protocol Buffers message per datagram:
//!
//! | tag | field    | type            |
//! |-----|----------|-----------------|
//! | 1   | domain   | string          |
//! | 2   | dnstype  | uint32          |
//! | 3   | dnsclass | uint32          |
//! | 4   | tdns     | string          |
//! | 5   | tport    | string          |
//! | 6   | rr       | repeated string |

use dns_relay_domain::{DomainError, QueryEnvelope};
use prost::Message as _;

#[derive(Clone, PartialEq, prost::Message)]
pub struct WireEnvelope {
    #[prost(string, tag = "1")]
    pub domain: String,
    #[prost(uint32, tag = "2")]
    pub dnstype: u32,
    #[prost(uint32, tag = "3")]
    pub dnsclass: u32,
    #[prost(string, tag = "4")]
    pub tdns: String,
    #[prost(string, tag = "5")]
    pub tport: String,
    #[prost(string, repeated, tag = "6")]
    pub rr: Vec<String>,
}

impl From<WireEnvelope> for QueryEnvelope {
    fn from(wire: WireEnvelope) -> Self {
        Self {
            domain: wire.domain,
            record_type: wire.dnstype,
            record_class: wire.dnsclass,
            target_server: wire.tdns,
            return_port: wire.tport,
            records: wire.rr,
        }
    }
}

impl From<&QueryEnvelope> for WireEnvelope {
    fn from(envelope: &QueryEnvelope) -> Self {
        Self {
            domain: envelope.domain.clone(),
            dnstype: envelope.record_type,
            dnsclass: envelope.record_class,
            tdns: envelope.target_server.clone(),
            tport: envelope.return_port.clone(),
            rr: envelope.records.clone(),
        }
    }
}

pub struct EnvelopeCodec;

impl EnvelopeCodec {
    pub fn decode(bytes: &[u8]) -> Result<QueryEnvelope, DomainError> {
        WireEnvelope::decode(bytes)
            .map(QueryEnvelope::from)
            .map_err(|e| DomainError::InvalidEnvelope(e.to_string()))
    }

    pub fn encode(envelope: &QueryEnvelope) -> Vec<u8> {
        WireEnvelope::from(envelope).encode_to_vec()
    }
}
