//! TCP and UDP connections to a Graphite server.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;

use crate::config::{SinkConfig, Transport};
use crate::error::Error;
use crate::message::pack_datagrams;

/// An open connection to the server.
#[derive(Debug)]
pub enum Connection {
    Tcp(TcpStream),
    Udp(UdpSocket),
}

impl Connection {
    /// Connect (TCP) or bind and associate (UDP) with the configured server.
    pub async fn establish(config: &SinkConfig) -> Result<Self, Error> {
        let address = config.address();

        match config.transport {
            Transport::Tcp => {
                let stream = bounded(config.timeout, TcpStream::connect(&address))
                    .await?
                    .map_err(|e| {
                        Error::Connection(format!("failed to connect to {}: {}", address, e))
                    })?;
                stream.set_nodelay(true)?;
                Ok(Connection::Tcp(stream))
            }
            Transport::Udp => {
                let target = resolve(&address, config.timeout).await?;
                let local: SocketAddr = if target.is_ipv4() {
                    (Ipv4Addr::UNSPECIFIED, 0).into()
                } else {
                    (Ipv6Addr::UNSPECIFIED, 0).into()
                };
                let socket = UdpSocket::bind(local).await.map_err(|e| {
                    Error::Connection(format!("failed to bind udp socket: {}", e))
                })?;
                socket.connect(target).await.map_err(|e| {
                    Error::Connection(format!("failed to associate with {}: {}", target, e))
                })?;
                Ok(Connection::Udp(socket))
            }
        }
    }

    /// Write a batch of encoded lines. Returns the number of bytes written.
    pub async fn write_lines(
        &mut self,
        lines: &[String],
        config: &SinkConfig,
    ) -> Result<usize, Error> {
        match self {
            Connection::Tcp(stream) => {
                let payload = lines.concat();
                bounded(config.timeout, stream.write_all(payload.as_bytes())).await??;
                bounded(config.timeout, stream.flush()).await??;
                Ok(payload.len())
            }
            Connection::Udp(socket) => {
                let mut written = 0;
                for datagram in pack_datagrams(lines, config.max_datagram_size) {
                    written += bounded(config.timeout, socket.send(&datagram)).await??;
                }
                Ok(written)
            }
        }
    }

    /// Close the write side. A no-op for UDP.
    pub async fn shutdown(self) -> Result<(), Error> {
        match self {
            Connection::Tcp(mut stream) => {
                stream.shutdown().await?;
                Ok(())
            }
            Connection::Udp(_) => Ok(()),
        }
    }
}

/// Resolve `host:port` to the first address returned.
async fn resolve(address: &str, limit: Duration) -> Result<SocketAddr, Error> {
    let mut addrs = bounded(limit, tokio::net::lookup_host(address))
        .await?
        .map_err(|e| Error::Connection(format!("failed to resolve {}: {}", address, e)))?;
    addrs
        .next()
        .ok_or_else(|| Error::Connection(format!("no addresses found for {}", address)))
}

/// Run a future under the configured timeout.
async fn bounded<F: std::future::Future>(limit: Duration, fut: F) -> Result<F::Output, Error> {
    timeout(limit, fut).await.map_err(|_| Error::Timeout(limit))
}
