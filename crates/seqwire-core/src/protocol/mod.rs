//! Protocol modules (tagged envelopes over the OSC primitive).
//!
//! The wire primitive (address + typed args -> datagram bytes) is `rosc`;
//! this module layers the self-describing envelope scheme on top:
//! - every envelope is an OSC bundle whose first message is
//!   `/bundle_info [<kind>]`,
//! - the kind's own metadata follows as a `/<kind>_info` message,
//! - remaining contents are ordered children (messages or nested envelopes).
//!
//! All parsers are panic-free: malformed input is reported as `SeqwireError`
//! instead of panicking or indexing raw buffers, keeping the receive loop
//! resilient to hostile traffic.

pub mod args;
pub mod envelope;
pub mod queue;

pub use args::OscArgs;
pub use envelope::{decode_datagram, Envelope, Inbound};
pub use queue::{QueueUpdate, TimedEvent, MAX_OFFSET_SECS};

/// Envelope kind discriminant for a full queue replacement.
pub const KIND_UPDATE_QUEUE: &str = "update_queue";
/// Envelope kind discriminant for a single time-offset message.
pub const KIND_TIMED_MSG: &str = "timed_msg";
