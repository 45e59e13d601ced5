//! Pass-through relay to the playback engine.
//!
//! Realtime control messages that are not queue updates (tempo changes,
//! immediate sample triggers) are forwarded as-is on the dedicated out
//! socket. Their payloads are opaque to the sequencer.

use std::sync::Arc;

use async_trait::async_trait;
use rosc::OscMessage;

use seqwire_core::error::Result;

use crate::dispatch::MessageHandler;
use crate::transport::OscSender;

pub struct RelayHandler {
    address: &'static str,
    sender: Arc<OscSender>,
}

impl RelayHandler {
    pub fn new(address: &'static str, sender: Arc<OscSender>) -> Self {
        Self { address, sender }
    }
}

#[async_trait]
impl MessageHandler for RelayHandler {
    fn address(&self) -> &'static str {
        self.address
    }

    async fn handle(&self, msg: OscMessage) -> Result<()> {
        tracing::debug!(addr = %msg.addr, "relaying to playback engine");
        self.sender.send_message(&msg).await
    }
}
