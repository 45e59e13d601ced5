//! seqwire core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the tagged-bundle envelope codec, the queue/event model,
//! and the error surface shared by the daemon and by sender-side tooling. It
//! intentionally carries no runtime dependencies so it can be reused on both
//! ends of the wire.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SeqwireError`/`Result` so the receive
//! loop never crashes on malformed datagrams.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, SeqwireError};
