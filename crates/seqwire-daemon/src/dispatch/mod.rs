//! Address-keyed dispatch for plain (non-envelope) OSC messages.

pub mod dispatcher;
pub mod relay;

pub use dispatcher::{Dispatcher, MessageHandler};
pub use relay::RelayHandler;
