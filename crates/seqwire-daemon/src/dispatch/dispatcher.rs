use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use rosc::OscMessage;

use seqwire_core::error::Result;

/// Handler for one OSC address.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn address(&self) -> &'static str;
    async fn handle(&self, msg: OscMessage) -> Result<()>;
}

/// Registry and dispatcher for plain OSC messages, keyed by address.
///
/// Unmatched addresses are dropped with a warning, not an error: the address
/// namespace is owned by the playback engine and this layer only routes what
/// it was told about.
#[derive(Default)]
pub struct Dispatcher {
    handlers: DashMap<&'static str, Arc<dyn MessageHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn MessageHandler>) {
        self.handlers.insert(handler.address(), handler);
    }

    pub fn registered_addresses(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| *e.key()).collect()
    }

    pub async fn dispatch(&self, msg: OscMessage) -> Result<()> {
        let Some(entry) = self.handlers.get(msg.addr.as_str()) else {
            tracing::warn!(addr = %msg.addr, "no handler registered, dropping message");
            return Ok(());
        };
        let handler = entry.value().clone();
        drop(entry);
        handler.handle(msg).await
    }
}
