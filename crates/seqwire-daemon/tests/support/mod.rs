//! Shared test support: a recording event sink and message builders.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use rosc::{OscMessage, OscType};
use tokio::time::{Duration, Instant};

use seqwire_core::error::Result;
use seqwire_core::protocol::TimedEvent;
use seqwire_daemon::sequencer::EventSink;

/// Records (label, elapsed-since-creation) per delivered message. The label
/// is the first string arg, falling back to the address.
pub struct RecordingSink {
    start: Instant,
    fired: Mutex<Vec<(String, Duration)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            fired: Mutex::new(Vec::new()),
        }
    }

    pub fn fired(&self) -> Vec<(String, Duration)> {
        self.fired.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.fired().into_iter().map(|(label, _)| label).collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn deliver(&self, message: &OscMessage) -> Result<()> {
        let label = message
            .args
            .first()
            .and_then(|a| a.clone().string())
            .unwrap_or_else(|| message.addr.clone());
        self.fired
            .lock()
            .unwrap()
            .push((label, Instant::now() - self.start));
        Ok(())
    }
}

pub fn test_msg(label: &str) -> OscMessage {
    OscMessage {
        addr: "/test".to_string(),
        args: vec![OscType::String(label.to_string())],
    }
}

pub fn event(offset: f32, label: &str) -> TimedEvent {
    TimedEvent::new(offset, test_msg(label))
}
