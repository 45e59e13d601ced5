//! Shared daemon state wiring.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::time::Duration;

use seqwire_core::error::{Result, SeqwireError};

use crate::config::DaemonConfig;
use crate::dispatch::{Dispatcher, RelayHandler};
use crate::sequencer::QueueManager;
use crate::transport::OscSender;

/// Addresses relayed straight to the playback engine when they arrive as
/// plain messages rather than inside a queue. Opaque payloads, owned by the
/// engine.
const RELAY_ADDRESSES: [&str; 3] = ["/set_bpm", "/play_sample", "/note_on_timed"];

#[derive(Clone)]
pub struct DaemonState {
    sender: Arc<OscSender>,
    manager: Arc<QueueManager>,
    dispatcher: Arc<Dispatcher>,
}

impl DaemonState {
    /// Build daemon state: dedicated out socket, queue manager feeding it,
    /// and the dispatcher with built-in relay handlers.
    pub async fn new(cfg: &DaemonConfig) -> Result<Self> {
        let playback: SocketAddr = cfg
            .sequencer
            .playback
            .parse()
            .map_err(|e| SeqwireError::Config(format!("sequencer.playback: {e}")))?;

        let sender = Arc::new(OscSender::bind(playback).await?);

        let manager = Arc::new(QueueManager::new(
            sender.clone(),
            Duration::from_millis(cfg.sequencer.min_loop_ms),
        ));

        let dispatcher = Arc::new(Dispatcher::new());
        for addr in RELAY_ADDRESSES {
            dispatcher.register(Arc::new(RelayHandler::new(addr, sender.clone())));
        }

        Ok(Self {
            sender,
            manager,
            dispatcher,
        })
    }

    pub fn sender(&self) -> Arc<OscSender> {
        Arc::clone(&self.sender)
    }

    pub fn manager(&self) -> Arc<QueueManager> {
        Arc::clone(&self.manager)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }
}
