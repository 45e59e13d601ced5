//! Tagged-envelope codec on top of the OSC bundle primitive (panic-free).
//!
//! Every envelope is an OSC bundle whose first content is a
//! `/bundle_info [<kind>]` message; the remaining contents are the envelope's
//! ordered children. Bundles are self-delimiting on the wire (size-prefixed
//! elements), so nested envelopes decode without sibling look-ahead.
//!
//! The codec passes `kind` strings through unchanged; it knows nothing about
//! queue or playback semantics.

use bytes::Bytes;
use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};

use crate::error::{Result, SeqwireError};
use crate::protocol::args::OscArgs;

/// Address of the self-description message heading every envelope.
pub const BUNDLE_INFO_ADDR: &str = "/bundle_info";

/// OSC "immediately" timetag. Envelope scheduling is carried in info
/// messages, never in bundle timetags.
pub(crate) fn immediately() -> OscTime {
    OscTime {
        seconds: 0,
        fractional: 1,
    }
}

/// A decoded datagram: either a plain message or a tagged envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Message(OscMessage),
    Envelope(Envelope),
}

/// Self-describing nested container.
///
/// `kind` is the discriminant carried by the leading `/bundle_info` message
/// (e.g. `"update_queue"`, `"timed_msg"`); `contents` are the ordered children
/// that followed it, each a plain message or a nested bundle that is itself
/// decodable as an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub kind: String,
    pub contents: Vec<OscPacket>,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, contents: Vec<OscPacket>) -> Self {
        Self {
            kind: kind.into(),
            contents,
        }
    }

    /// Classify a decoded OSC bundle as an envelope.
    pub fn from_bundle(bundle: &OscBundle) -> Result<Envelope> {
        let first = bundle
            .content
            .first()
            .ok_or_else(|| SeqwireError::Truncated("empty bundle".into()))?;

        let info = match first {
            OscPacket::Message(msg) => msg,
            OscPacket::Bundle(_) => {
                return Err(SeqwireError::TypeMismatch(
                    "first element in bundle is not an info message".into(),
                ))
            }
        };
        info.expect_addr(BUNDLE_INFO_ADDR)?;
        let kind = info.string_at(0, "bundle kind")?;

        Ok(Envelope {
            kind,
            contents: bundle.content[1..].to_vec(),
        })
    }

    /// Serialize back to an OSC bundle: `/bundle_info [kind]` first, then
    /// each child in insertion order.
    pub fn to_bundle(&self) -> OscBundle {
        let mut content = Vec::with_capacity(self.contents.len() + 1);
        content.push(OscPacket::Message(OscMessage {
            addr: BUNDLE_INFO_ADDR.to_string(),
            args: vec![OscType::String(self.kind.clone())],
        }));
        content.extend(self.contents.iter().cloned());
        OscBundle {
            timetag: immediately(),
            content,
        }
    }

    pub fn to_packet(&self) -> OscPacket {
        OscPacket::Bundle(self.to_bundle())
    }

    /// Encode to a datagram.
    pub fn encode(&self) -> Result<Bytes> {
        let raw = rosc::encoder::encode(&self.to_packet())
            .map_err(|e| SeqwireError::Internal(format!("osc encode failed: {e:?}")))?;
        Ok(Bytes::from(raw))
    }

    /// Child at `index`, which must be a plain message.
    pub fn message_at(&self, index: usize) -> Result<&OscMessage> {
        match self.contents.get(index) {
            Some(OscPacket::Message(msg)) => Ok(msg),
            Some(OscPacket::Bundle(_)) => Err(SeqwireError::TypeMismatch(format!(
                "{} content {index} is a bundle, expected message",
                self.kind
            ))),
            None => Err(SeqwireError::Truncated(format!(
                "{} has no content at index {index}",
                self.kind
            ))),
        }
    }

    /// Child at `index`, which must be a bundle.
    pub fn bundle_at(&self, index: usize) -> Result<&OscBundle> {
        match self.contents.get(index) {
            Some(OscPacket::Bundle(bundle)) => Ok(bundle),
            Some(OscPacket::Message(_)) => Err(SeqwireError::TypeMismatch(format!(
                "{} content {index} is a message, expected bundle",
                self.kind
            ))),
            None => Err(SeqwireError::Truncated(format!(
                "{} has no content at index {index}",
                self.kind
            ))),
        }
    }

    /// Child at `index` classified as a nested envelope.
    pub fn envelope_at(&self, index: usize) -> Result<Envelope> {
        Envelope::from_bundle(self.bundle_at(index)?)
    }
}

/// Decode one datagram into a plain message or a tagged envelope.
///
/// Total over anything [`Envelope::encode`] produced; malformed bytes yield
/// a typed error, never a panic or partial state.
pub fn decode_datagram(buf: &[u8]) -> Result<Inbound> {
    let (_rest, packet) = rosc::decoder::decode_udp(buf).map_err(classify_osc_error)?;

    match packet {
        OscPacket::Message(msg) => Ok(Inbound::Message(msg)),
        OscPacket::Bundle(bundle) => Ok(Inbound::Envelope(Envelope::from_bundle(&bundle)?)),
    }
}

/// Map a primitive decode failure onto the protocol error taxonomy.
///
/// `BadBundle` is only produced for a bundle element shorter than its size
/// prefix, so it reports as truncation. `BadPacket` folds empty/incomplete
/// input together with an unreadable leading tag; truncation is the common
/// case on a datagram boundary, so it reports as truncation too.
fn classify_osc_error(e: rosc::OscError) -> SeqwireError {
    use rosc::OscError;
    let detail = format!("osc decode failed: {e}");
    match e {
        OscError::BadAddress(_) | OscError::BadAddressPattern(_) | OscError::RegexError(_) => {
            SeqwireError::BadTag(detail)
        }
        OscError::BadArg(_)
        | OscError::BadString(_)
        | OscError::BadChar(_)
        | OscError::BadMessage(_)
        | OscError::StringError(_) => SeqwireError::TypeMismatch(detail),
        OscError::ReadError(_)
        | OscError::BadPacket(_)
        | OscError::BadBundle(_)
        | OscError::Unimplemented => SeqwireError::Truncated(detail),
    }
}
