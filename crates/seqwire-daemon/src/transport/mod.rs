//! UDP transport: fire-and-forget send path, independently bound receive
//! loop.
//!
//! Send and receive never share a socket. A process that does both over one
//! blocking descriptor starves its receive loop while a send is pending a
//! lock on the same socket, and misses incoming datagrams. The sender binds
//! its own ephemeral port; the receive loop owns the configured listen port.

pub mod receiver;
pub mod sender;

pub use receiver::ReceiveLoop;
pub use sender::OscSender;

/// Receive buffer size. The default OSC MTU constant is far smaller than a
/// large queue update, which gets silently clipped on recv; size for the
/// largest UDP datagram instead.
pub const MAX_DATAGRAM: usize = 65_536;
