//! seqwire daemon
//!
//! Receiver side of the queue-update protocol:
//! - dedicated UDP listen socket -> decode-once -> classify
//! - `update_queue` envelopes atomically replace the live playback queue
//! - the queue manager fires each event at activation + offset
//! - everything else is relayed or dropped per the dispatcher

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use seqwire_daemon::{config, state::DaemonState, transport::ReceiveLoop};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("seqwire.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .sequencer
        .listen
        .parse()
        .expect("sequencer.listen must be a valid SocketAddr");

    let state = DaemonState::new(&cfg).await.expect("daemon init failed");

    let rx = ReceiveLoop::bind(listen, state.dispatcher(), state.manager())
        .await
        .expect("failed to bind listen socket");

    tracing::info!(%listen, playback = %state.sender().target(), "seqwire-daemon starting");
    let rx_task = tokio::spawn(rx.run());

    tokio::signal::ctrl_c().await.expect("ctrl_c failed");
    tracing::info!("shutting down");

    // Cancel the receive loop first, then any pending timers, so nothing
    // fires into a dead socket.
    rx_task.abort();
    state.manager().shutdown().await;
}
