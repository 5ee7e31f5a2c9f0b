#![allow(dead_code)]
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Udp,
    Tcp,
}

type Responder = Arc<dyn Fn(&Message, Protocol) -> Option<Message> + Send + Sync>;

/// Loopback DNS server answering over UDP and TCP on the same port.
///
/// The responder returns `None` to stay silent.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_hits: Arc<AtomicUsize>,
    tcp_hits: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(responder: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&Message, Protocol) -> Option<Message> + Send + Sync + 'static,
    {
        Self::start_with_delay(responder, Duration::ZERO).await
    }

    pub async fn start_with_delay<F>(responder: F, delay: Duration) -> Result<Self, std::io::Error>
    where
        F: Fn(&Message, Protocol) -> Option<Message> + Send + Sync + 'static,
    {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let responder: Responder = Arc::new(responder);
        let udp_hits = Arc::new(AtomicUsize::new(0));
        let tcp_hits = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        {
            let responder = Arc::clone(&responder);
            let udp_hits = Arc::clone(&udp_hits);
            let tcp_hits = Arc::clone(&tcp_hits);

            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];

                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        result = socket.recv_from(&mut buf) => {
                            if let Ok((len, peer)) = result {
                                udp_hits.fetch_add(1, Ordering::SeqCst);
                                if let Some(reply) = respond(&responder, &buf[..len], Protocol::Udp) {
                                    tokio::time::sleep(delay).await;
                                    let _ = socket.send_to(&reply, peer).await;
                                }
                            }
                        }
                        result = listener.accept() => {
                            if let Ok((mut stream, _)) = result {
                                tcp_hits.fetch_add(1, Ordering::SeqCst);
                                let responder = Arc::clone(&responder);
                                tokio::spawn(async move {
                                    let mut len = [0u8; 2];
                                    if stream.read_exact(&mut len).await.is_err() {
                                        return;
                                    }
                                    let mut query = vec![0u8; u16::from_be_bytes(len) as usize];
                                    if stream.read_exact(&mut query).await.is_err() {
                                        return;
                                    }
                                    if let Some(reply) = respond(&responder, &query, Protocol::Tcp) {
                                        let mut framed = (reply.len() as u16).to_be_bytes().to_vec();
                                        framed.extend_from_slice(&reply);
                                        let _ = stream.write_all(&framed).await;
                                    }
                                });
                            }
                        }
                    }
                }
            });
        }

        Ok(Self {
            addr,
            udp_hits,
            tcp_hits,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_hits(&self) -> usize {
        self.udp_hits.load(Ordering::SeqCst)
    }

    pub fn tcp_hits(&self) -> usize {
        self.tcp_hits.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn respond(responder: &Responder, query: &[u8], protocol: Protocol) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;
    let reply = responder(&request, protocol)?;

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    reply.emit(&mut encoder).ok()?;
    Some(buf)
}
