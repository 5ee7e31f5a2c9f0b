use super::ConfigError;
use crate::RecordLineFilter;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// IPv4 addresses of the IANA root servers (a through m).
pub const IANA_ROOT_SERVERS: &[&str] = &[
    "198.41.0.4",
    "170.247.170.2",
    "192.33.4.12",
    "199.7.91.13",
    "192.203.230.10",
    "192.5.5.241",
    "192.112.36.4",
    "198.97.190.53",
    "192.36.148.17",
    "192.58.128.30",
    "193.0.14.129",
    "199.7.83.42",
    "202.12.27.33",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    #[serde(default)]
    pub line_filter: RecordLineFilter,

    #[serde(default = "default_iterative_max_hops")]
    pub iterative_max_hops: usize,

    #[serde(default = "default_iterative_max_cname_chain")]
    pub iterative_max_cname_chain: usize,

    #[serde(default = "default_nameserver_cache_capacity")]
    pub nameserver_cache_capacity: usize,

    #[serde(default = "default_root_servers")]
    pub root_servers: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            upstream_port: default_upstream_port(),
            line_filter: RecordLineFilter::default(),
            iterative_max_hops: default_iterative_max_hops(),
            iterative_max_cname_chain: default_iterative_max_cname_chain(),
            nameserver_cache_capacity: default_nameserver_cache_capacity(),
            root_servers: default_root_servers(),
        }
    }
}

impl ResolverConfig {
    pub fn root_server_addrs(&self) -> Result<Vec<IpAddr>, ConfigError> {
        self.root_servers
            .iter()
            .map(|s| {
                s.trim().parse::<IpAddr>().map_err(|_| {
                    ConfigError::Validation(format!("Invalid root server address: '{}'", s))
                })
            })
            .collect()
    }
}

fn default_query_timeout_ms() -> u64 {
    5000
}

fn default_upstream_port() -> u16 {
    53
}

fn default_iterative_max_hops() -> usize {
    32
}

fn default_iterative_max_cname_chain() -> usize {
    8
}

fn default_nameserver_cache_capacity() -> usize {
    5000
}

fn default_root_servers() -> Vec<String> {
    IANA_ROOT_SERVERS.iter().map(|s| s.to_string()).collect()
}
