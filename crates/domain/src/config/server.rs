use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the query listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Address advertised in the registration key.
    #[serde(default = "default_listening_address")]
    pub listening_address: String,

    #[serde(default = "default_listening_port")]
    pub listening_port: u16,

    /// Upper bound on concurrently resolving envelopes. The accept loop
    /// waits for a free slot once this many are in flight.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    #[serde(default = "default_recv_buffer_size")]
    pub recv_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            listening_address: default_listening_address(),
            listening_port: default_listening_port(),
            max_in_flight: default_max_in_flight(),
            recv_buffer_size: default_recv_buffer_size(),
        }
    }
}

impl ServerConfig {
    pub fn bind_socket_addr(&self) -> String {
        if self.bind_address.contains(':') {
            format!("[{}]:{}", self.bind_address, self.listening_port)
        } else {
            format!("{}:{}", self.bind_address, self.listening_port)
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_listening_address() -> String {
    "127.0.0.1".to_string()
}

fn default_listening_port() -> u16 {
    5353
}

fn default_max_in_flight() -> usize {
    1024
}

fn default_recv_buffer_size() -> usize {
    2000
}
