//! Receiver-side queue management and event scheduling.

pub mod manager;
pub mod sink;

pub use manager::{QueueManager, SlotState};
pub use sink::EventSink;
