use std::net::SocketAddr;

use serde::Deserialize;
use seqwire_core::error::{Result, SeqwireError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    pub version: u32,

    #[serde(default)]
    pub sequencer: SequencerSection,
}

impl DaemonConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SeqwireError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.sequencer.validate()?;

        Ok(())
    }
}

/// Ports are deployment configuration, not protocol constants.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequencerSection {
    /// Incoming queue updates and control messages arrive here.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Fired event payloads and relayed messages go here (playback engine).
    #[serde(default = "default_playback")]
    pub playback: String,

    /// Floor for the loop period of a persistent queue, so an
    /// all-at-offset-zero queue cannot busy-spin.
    #[serde(default = "default_min_loop_ms")]
    pub min_loop_ms: u64,
}

impl Default for SequencerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            playback: default_playback(),
            min_loop_ms: default_min_loop_ms(),
        }
    }
}

impl SequencerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<SocketAddr>().map_err(|e| {
            SeqwireError::Config(format!("sequencer.listen is not a valid SocketAddr: {e}"))
        })?;
        self.playback.parse::<SocketAddr>().map_err(|e| {
            SeqwireError::Config(format!(
                "sequencer.playback is not a valid SocketAddr: {e}"
            ))
        })?;
        if !(1..=1000).contains(&self.min_loop_ms) {
            return Err(SeqwireError::Config(
                "sequencer.min_loop_ms must be between 1 and 1000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "127.0.0.1:14441".into()
}
fn default_playback() -> String {
    "127.0.0.1:14447".into()
}
fn default_min_loop_ms() -> u64 {
    25
}
