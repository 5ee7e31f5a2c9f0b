use super::codec::EnvelopeCodec;
use dns_relay_application::use_cases::ResolveEnvelopeUseCase;
use dns_relay_domain::QueryEnvelope;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace, warn};

const DEFAULT_MAX_IN_FLIGHT: usize = 1024;
const DEFAULT_RECV_BUFFER_SIZE: usize = 2000;

/// Accept loop for inbound envelopes.
///
/// Every decoded envelope is resolved on its own task, so a slow upstream
/// never holds up the next datagram. At most `max_in_flight` tasks run at
/// once; when all permits are taken the loop waits before reading again.
pub struct QueryServer {
    use_case: Arc<ResolveEnvelopeUseCase>,
    max_in_flight: usize,
    recv_buffer_size: usize,
}

impl QueryServer {
    pub fn new(use_case: Arc<ResolveEnvelopeUseCase>) -> Self {
        Self {
            use_case,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn with_recv_buffer_size(mut self, recv_buffer_size: usize) -> Self {
        self.recv_buffer_size = recv_buffer_size.max(1);
        self
    }

    /// Runs until the task is dropped.
    pub async fn serve(&self, socket: UdpSocket) {
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut buf = vec![0u8; self.recv_buffer_size];

        if let Ok(addr) = socket.local_addr() {
            info!(
                bind_address = %addr,
                max_in_flight = self.max_in_flight,
                "Query server listening"
            );
        }

        loop {
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                return;
            };

            let (len, sender) = match socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "Failed to receive datagram");
                    continue;
                }
            };

            let envelope = match EnvelopeCodec::decode(&buf[..len]) {
                Ok(envelope) => envelope,
                Err(e) => {
                    trace!(sender = %sender, error = %e, "Dropping undecodable datagram");
                    continue;
                }
            };

            let use_case = Arc::clone(&self.use_case);
            tokio::spawn(async move {
                let _permit = permit;
                respond(&use_case, envelope, sender).await;
            });
        }
    }
}

async fn respond(use_case: &ResolveEnvelopeUseCase, envelope: QueryEnvelope, sender: SocketAddr) {
    let return_port = match envelope.return_port_number() {
        Ok(port) => port,
        Err(e) => {
            debug!(sender = %sender, error = %e, "Dropping request without usable return port");
            return;
        }
    };

    let resolved = match use_case.execute(envelope).await {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!(sender = %sender, error = %e, "Resolution failed, dropping request");
            return;
        }
    };

    let reply_to = SocketAddr::new(sender.ip(), return_port);
    if let Err(e) = send_reply(reply_to, &EnvelopeCodec::encode(&resolved)).await {
        debug!(reply_to = %reply_to, error = %e, "Failed to deliver reply");
    }
}

async fn send_reply(reply_to: SocketAddr, bytes: &[u8]) -> std::io::Result<()> {
    let local: SocketAddr = if reply_to.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(local).await?;
    socket.send_to(bytes, reply_to).await?;
    Ok(())
}
