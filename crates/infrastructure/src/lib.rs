//! DNS Relay Infrastructure Layer
pub mod dns;
pub mod registration;
