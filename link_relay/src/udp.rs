//! Fire-and-forget UDP channel to the local consumer.
//!
//! The relay sends every snapshot to a fixed loopback destination
//! ([`RELAY_DESTINATION`]). Nothing is ever read back; delivery is not
//! guaranteed and a dropped datagram is superseded by the next tick.

use link::consts::RELAY_DESTINATION;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use tracing::info;

use crate::error::SocketError;

/// Connectionless datagram socket bound to an ephemeral loopback port.
///
/// POSIX sockets need no process-wide network initialization; the socket is
/// closed when the channel is dropped.
#[derive(Debug)]
pub struct UdpChannel {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpChannel {
    /// Create the channel targeting the fixed relay destination.
    ///
    /// # Errors
    /// `SocketError` if the socket cannot be bound or configured.
    pub fn init() -> Result<Self, SocketError> {
        Self::with_destination(RELAY_DESTINATION)
    }

    /// Create a channel targeting `destination`.
    ///
    /// The relay binary always goes through [`UdpChannel::init`].
    pub fn with_destination(destination: SocketAddr) -> Result<Self, SocketError> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let socket = UdpSocket::bind(addr).map_err(|source| SocketError::Bind { addr, source })?;
        socket
            .set_nonblocking(true)
            .map_err(|source| SocketError::NonBlocking { source })?;

        info!(
            "Created UDP socket {} -> {}",
            socket
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "?".to_string()),
            destination
        );

        Ok(Self {
            socket,
            destination,
        })
    }

    /// Destination every datagram goes to.
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Local address of the socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Send one datagram. Never waits for a reply.
    #[inline]
    pub fn send(&self, bytes: &[u8]) -> io::Result<usize> {
        self.socket.send_to(bytes, self.destination)
    }
}
