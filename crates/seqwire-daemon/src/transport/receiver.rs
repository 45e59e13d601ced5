//! Receive/dispatch loop.
//!
//! Decode each datagram once, then classify:
//! - `update_queue` envelope -> queue manager (atomic replace)
//! - other envelope kinds    -> warn + drop
//! - plain message           -> address-keyed dispatcher
//! - decode failure          -> warn + continue
//!
//! No single datagram can take the loop down; it must survive malformed
//! traffic indefinitely.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;

use seqwire_core::error::{Result, SeqwireError};
use seqwire_core::protocol::{decode_datagram, Inbound, QueueUpdate, KIND_UPDATE_QUEUE};

use crate::dispatch::Dispatcher;
use crate::sequencer::QueueManager;
use crate::transport::MAX_DATAGRAM;

pub struct ReceiveLoop {
    socket: UdpSocket,
    dispatcher: Arc<Dispatcher>,
    manager: Arc<QueueManager>,
}

impl ReceiveLoop {
    /// Bind the dedicated listen socket (never shared with the send path).
    pub async fn bind(
        listen: SocketAddr,
        dispatcher: Arc<Dispatcher>,
        manager: Arc<QueueManager>,
    ) -> Result<ReceiveLoop> {
        let socket = UdpSocket::bind(listen)
            .await
            .map_err(|e| SeqwireError::Internal(format!("bind {listen} failed: {e}")))?;
        Ok(ReceiveLoop {
            socket,
            dispatcher,
            manager,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| SeqwireError::Internal(format!("local_addr failed: {e}")))
    }

    /// Run until the task is cancelled.
    pub async fn run(self) {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, peer)) => {
                    tracing::debug!(%peer, len, "datagram received");
                    self.process(&buf[..len]).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "recv failed, continuing");
                }
            }
        }
    }

    /// Decode and route one datagram. Errors are logged, never returned:
    /// a malformed packet leaves the current queue untouched.
    pub async fn process(&self, datagram: &[u8]) {
        match decode_datagram(datagram) {
            Ok(Inbound::Envelope(env)) if env.kind == KIND_UPDATE_QUEUE => {
                match QueueUpdate::from_envelope(&env) {
                    Ok(update) => self.manager.apply(update).await,
                    Err(e) => {
                        tracing::warn!(kind = e.kind().as_str(), error = %e, "bad queue update, dropping");
                    }
                }
            }
            Ok(Inbound::Envelope(env)) => {
                tracing::warn!(kind = %env.kind, "unhandled envelope kind, dropping");
            }
            Ok(Inbound::Message(msg)) => {
                if let Err(e) = self.dispatcher.dispatch(msg).await {
                    tracing::warn!(kind = e.kind().as_str(), error = %e, "handler failed");
                }
            }
            Err(e) => {
                tracing::warn!(kind = e.kind().as_str(), error = %e, "undecodable datagram, dropping");
            }
        }
    }
}
