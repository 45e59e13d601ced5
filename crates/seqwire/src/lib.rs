//! Top-level facade crate for seqwire.
//!
//! Re-exports the protocol core and the daemon library so users can depend
//! on a single crate.

pub mod core {
    pub use seqwire_core::*;
}

pub mod daemon {
    pub use seqwire_daemon::*;
}
