//! Request and response bodies of the etcd v3 JSON gateway.
//!
//! The gateway renders int64 fields as JSON strings, byte fields as
//! base64, and streaming RPCs as newline-delimited `{"result": ...}`
//! objects.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

pub const AUTHENTICATE_PATH: &str = "/v3/auth/authenticate";
pub const STATUS_PATH: &str = "/v3/maintenance/status";
pub const LEASE_GRANT_PATH: &str = "/v3/lease/grant";
pub const LEASE_KEEPALIVE_PATH: &str = "/v3/lease/keepalive";
pub const KV_PUT_PATH: &str = "/v3/kv/put";

#[derive(Debug, Serialize)]
pub struct AuthenticateRequest<'a> {
    pub name: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AuthenticateResponse {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct StatusRequest {}

#[derive(Debug, Serialize)]
pub struct LeaseGrantRequest {
    #[serde(rename = "TTL")]
    pub ttl: i64,
}

#[derive(Debug, Deserialize)]
pub struct LeaseGrantResponse {
    #[serde(rename = "ID", default, deserialize_with = "int64")]
    pub id: i64,
    #[serde(rename = "TTL", default, deserialize_with = "int64")]
    pub ttl: i64,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct PutRequest {
    pub key: String,
    pub value: String,
    pub lease: String,
}

impl PutRequest {
    pub fn new(key: &str, value: &str, lease: i64) -> Self {
        Self {
            key: STANDARD.encode(key),
            value: STANDARD.encode(value),
            lease: lease.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeepAliveRequest {
    #[serde(rename = "ID")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct KeepAliveResponse {
    pub result: Option<KeepAliveResult>,
}

#[derive(Debug, Deserialize)]
pub struct KeepAliveResult {
    #[serde(rename = "ID", default, deserialize_with = "int64")]
    pub id: i64,
    #[serde(rename = "TTL", default, deserialize_with = "int64")]
    pub ttl: i64,
}

/// Parse the first JSON object of a gateway response body.
pub fn parse_body<R: DeserializeOwned>(body: &str) -> Result<R, String> {
    let first = body
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("{}");

    serde_json::from_str(first).map_err(|e| format!("malformed gateway response: {}", e))
}

/// `host:port` becomes `http://host:port`; trailing slashes are dropped.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Int64 {
    Number(i64),
    Text(String),
}

fn int64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Int64::deserialize(deserializer)? {
        Int64::Number(n) => Ok(n),
        Int64::Text(s) => s.parse().map_err(D::Error::custom),
    }
}
