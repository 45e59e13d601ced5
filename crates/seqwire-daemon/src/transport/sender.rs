//! Fire-and-forget OSC send path.

use std::net::SocketAddr;

use rosc::{OscMessage, OscPacket};
use tokio::net::UdpSocket;

use seqwire_core::error::{Result, SeqwireError};
use seqwire_core::protocol::Envelope;

/// One datagram per call, at most once: no acknowledgement, no retry.
/// Failures surface as `SeqwireError::Send` to the caller.
pub struct OscSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscSender {
    /// Bind a dedicated ephemeral out socket aimed at `target`.
    pub async fn bind(target: SocketAddr) -> Result<OscSender> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| SeqwireError::Send(format!("bind out socket failed: {e}")))?;
        Ok(OscSender { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| SeqwireError::Internal(format!("local_addr failed: {e}")))
    }

    pub async fn send_packet(&self, packet: &OscPacket) -> Result<()> {
        let raw = rosc::encoder::encode(packet)
            .map_err(|e| SeqwireError::Internal(format!("osc encode failed: {e:?}")))?;
        self.socket
            .send_to(&raw, self.target)
            .await
            .map_err(|e| SeqwireError::Send(format!("send to {} failed: {e}", self.target)))?;
        Ok(())
    }

    pub async fn send_message(&self, msg: &OscMessage) -> Result<()> {
        self.send_packet(&OscPacket::Message(msg.clone())).await
    }

    pub async fn send_envelope(&self, envelope: &Envelope) -> Result<()> {
        let raw = envelope.encode()?;
        self.socket
            .send_to(&raw, self.target)
            .await
            .map_err(|e| SeqwireError::Send(format!("send to {} failed: {e}", self.target)))?;
        Ok(())
    }
}
