//! Versioned binary frame codec.
//!
//! # Frame layout
//!
//! ```text
//! +---------+----------------------------------+
//! | version | bincode(Vec<Envelope>)           |
//! | 1 byte  | rest of frame                    |
//! +---------+----------------------------------+
//! ```
//!
//! One frame carries every message queued for a destination that tick.
//! Decoding is all-or-nothing: a frame from a different protocol version, or
//! one whose payload fails to deserialize, is rejected whole so a peer never
//! applies half a batch.

use gw_core::EntityId;

use crate::message::Envelope;
use crate::{WireError, WireResult};

/// Bumped on any incompatible change to `Envelope` or its payloads.
pub const FRAME_VERSION: u8 = 1;

/// Encode a batch of messages into one self-describing frame.
pub fn encode_frame(messages: &[Envelope]) -> WireResult<Vec<u8>> {
    let body = bincode::serialize(messages)?;
    let mut frame = Vec::with_capacity(1 + body.len());
    frame.push(FRAME_VERSION);
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decode a frame produced by `encode_frame`.  Any failure rejects the whole
/// frame.
pub fn decode_frame(frame: &[u8]) -> WireResult<Vec<Envelope>> {
    let (&version, body) = frame.split_first().ok_or(WireError::EmptyFrame)?;
    if version != FRAME_VERSION {
        return Err(WireError::VersionMismatch { got: version, want: FRAME_VERSION });
    }
    let messages: Vec<Envelope> = bincode::deserialize(body)?;
    Ok(messages)
}

/// Summarize a batch for log lines without dumping payloads.
pub fn describe_batch(messages: &[Envelope]) -> String {
    let entities: Vec<EntityId> = messages.iter().map(|m| m.entity).collect();
    format!("{} message(s) for {:?}", messages.len(), entities)
}
