#![allow(dead_code)]
use async_trait::async_trait;
use dns_relay_domain::DomainError;
use dns_relay_infrastructure::dns::DnsExchange;
use hickory_proto::op::Message;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};

type Responder = Arc<dyn Fn(&Message) -> Message + Send + Sync>;

/// In-memory nameservers keyed by IP. Unknown addresses time out.
#[derive(Default)]
pub struct StubExchange {
    responders: HashMap<IpAddr, Responder>,
    calls: Mutex<Vec<(SocketAddr, Message)>>,
}

impl StubExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, ip: &str, responder: F) -> Self
    where
        F: Fn(&Message) -> Message + Send + Sync + 'static,
    {
        self.responders
            .insert(ip.parse().unwrap(), Arc::new(responder));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, ip: &str) -> usize {
        let ip: IpAddr = ip.parse().unwrap();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(server, _)| server.ip() == ip)
            .count()
    }

    pub fn requests(&self) -> Vec<(SocketAddr, Message)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl DnsExchange for StubExchange {
    async fn exchange(
        &self,
        server: SocketAddr,
        request: &Message,
    ) -> Result<Message, DomainError> {
        self.calls.lock().unwrap().push((server, request.clone()));

        match self.responders.get(&server.ip()) {
            Some(responder) => Ok(responder(request)),
            None => Err(DomainError::TransportTimeout {
                server: server.to_string(),
            }),
        }
    }
}
