//! seqwire daemon library entry.
//!
//! This crate wires the UDP transport, the address-keyed dispatcher, and the
//! queue manager into the receiver-side runtime. It is intended to be
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod config;
pub mod dispatch;
pub mod sequencer;
pub mod state;
pub mod transport;
