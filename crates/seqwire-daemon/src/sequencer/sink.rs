//! Delivery seam between the scheduler and the playback engine.

use async_trait::async_trait;
use rosc::OscMessage;

use seqwire_core::error::Result;

use crate::transport::OscSender;

/// Where fired event payloads go. Production uses the UDP send path to the
/// playback engine; tests record firings instead.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, message: &OscMessage) -> Result<()>;
}

#[async_trait]
impl EventSink for OscSender {
    async fn deliver(&self, message: &OscMessage) -> Result<()> {
        self.send_message(message).await
    }
}
