use anyhow::Context;
use dns_relay_domain::config::ServerConfig;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::UdpSocket;

const SOCKET_BUFFER_SIZE: usize = 512 * 1024;

pub fn bind_query_socket(config: &ServerConfig) -> anyhow::Result<UdpSocket> {
    let bind_addr = config.bind_socket_addr();
    let socket_addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind_addr))?;

    create_udp_socket(socket_addr).with_context(|| format!("binding {}", socket_addr))
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
