//! Queue/event model and the event composer.
//!
//! Wire shape of a full queue replacement:
//!
//! ```text
//! bundle:
//!   /bundle_info        ["update_queue"]
//!   /update_queue_info  ["<name>"]            (or ["<name>", 1] for one-shot)
//!   bundle:                                   <- plain wrapper, one entry per event
//!     bundle:
//!       /bundle_info       ["timed_msg"]
//!       /timed_msg_info    [<offset seconds>]
//!       <payload message>
//!     ...
//! ```
//!
//! The composer is a structural transform only: no reordering, no
//! deduplication, no inspection of payload addresses. Insertion order is
//! preserved through encode/decode; ordering by offset is the scheduler's
//! job, not the wire format's.

use rosc::{OscBundle, OscMessage, OscPacket, OscType};

use crate::error::{Result, SeqwireError};
use crate::protocol::args::OscArgs;
use crate::protocol::envelope::{immediately, Envelope};
use crate::protocol::{KIND_TIMED_MSG, KIND_UPDATE_QUEUE};

const TIMED_MSG_INFO_ADDR: &str = "/timed_msg_info";
const UPDATE_QUEUE_INFO_ADDR: &str = "/update_queue_info";

/// Ceiling for a decoded event offset, in seconds. Anything above this (or
/// non-finite, or negative) is a protocol error, not a schedulable time.
pub const MAX_OFFSET_SECS: f32 = 86_400.0;

/// One payload message due `offset` seconds after queue activation.
///
/// Offsets are relative to activation, not wall clock; several events may
/// share an offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub offset: f32,
    pub message: OscMessage,
}

impl TimedEvent {
    pub fn new(offset: f32, message: OscMessage) -> Self {
        Self { offset, message }
    }

    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(
            KIND_TIMED_MSG,
            vec![
                OscPacket::Message(OscMessage {
                    addr: TIMED_MSG_INFO_ADDR.to_string(),
                    args: vec![OscType::Float(self.offset)],
                }),
                OscPacket::Message(self.message.clone()),
            ],
        )
    }

    pub fn from_envelope(envelope: &Envelope) -> Result<TimedEvent> {
        if envelope.kind != KIND_TIMED_MSG {
            return Err(SeqwireError::BadTag(format!(
                "attempted to parse {} as {KIND_TIMED_MSG}",
                envelope.kind
            )));
        }

        let info = envelope.message_at(0)?;
        info.expect_addr(TIMED_MSG_INFO_ADDR)?;
        let offset = info.float_at(0, "offset")?;
        // NaN fails the range check too.
        if !(0.0..=MAX_OFFSET_SECS).contains(&offset) {
            return Err(SeqwireError::TypeMismatch(format!(
                "offset not in 0..={MAX_OFFSET_SECS}: {offset}"
            )));
        }

        let message = envelope.message_at(1)?.clone();

        Ok(TimedEvent { offset, message })
    }
}

/// A named, ordered set of time-offset events: one playback program,
/// replaceable atomically on the receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueUpdate {
    pub name: String,
    /// `true`: discard after one full playback pass. `false`: loop.
    pub one_shot: bool,
    pub events: Vec<TimedEvent>,
}

impl QueueUpdate {
    /// The event composer. Purely structural; events keep insertion order.
    pub fn compose(name: impl Into<String>, one_shot: bool, events: Vec<TimedEvent>) -> Self {
        Self {
            name: name.into(),
            one_shot,
            events,
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        let mut info_args = vec![OscType::String(self.name.clone())];
        if self.one_shot {
            info_args.push(OscType::Int(1));
        }

        let wrapper = OscBundle {
            timetag: immediately(),
            content: self.events.iter().map(|ev| ev.to_envelope().to_packet()).collect(),
        };

        Envelope::new(
            KIND_UPDATE_QUEUE,
            vec![
                OscPacket::Message(OscMessage {
                    addr: UPDATE_QUEUE_INFO_ADDR.to_string(),
                    args: info_args,
                }),
                OscPacket::Bundle(wrapper),
            ],
        )
    }

    pub fn from_envelope(envelope: &Envelope) -> Result<QueueUpdate> {
        if envelope.kind != KIND_UPDATE_QUEUE {
            return Err(SeqwireError::BadTag(format!(
                "attempted to parse {} as {KIND_UPDATE_QUEUE}",
                envelope.kind
            )));
        }

        let info = envelope.message_at(0)?;
        info.expect_addr(UPDATE_QUEUE_INFO_ADDR)?;
        let name = info.string_at(0, "queue name")?;
        let one_shot = matches!(info.maybe_int_at(1, "one_shot")?, Some(1));

        let wrapper = envelope.bundle_at(1)?;
        let mut events = Vec::with_capacity(wrapper.content.len());
        for packet in &wrapper.content {
            match packet {
                OscPacket::Bundle(bundle) => {
                    events.push(TimedEvent::from_envelope(&Envelope::from_bundle(bundle)?)?);
                }
                OscPacket::Message(msg) => {
                    // Tolerated on the wire, same as the reference senders.
                    tracing::warn!(addr = %msg.addr, "non-bundle entry in queue update, skipping");
                }
            }
        }

        Ok(QueueUpdate {
            name,
            one_shot,
            events,
        })
    }
}
