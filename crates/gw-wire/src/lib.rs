//! `gw-wire` — typed sync messages and the binary frame codec.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`message`] | `Envelope`, `MessageBody`, attach/update payload enums     |
//! | [`codec`]   | `encode_frame` / `decode_frame`, `FRAME_VERSION`           |
//! | [`error`]   | `WireError`, `WireResult<T>`                               |
//!
//! # Compatibility
//!
//! The first byte of every frame is `FRAME_VERSION`.  Peers built against a
//! different version reject each other's frames whole rather than guessing
//! at field layouts; there is no negotiation, matching versions are assumed
//! once a session is accepted.

pub mod codec;
pub mod error;
pub mod message;

#[cfg(test)]
mod tests;

pub use codec::{FRAME_VERSION, decode_frame, describe_batch, encode_frame};
pub use error::{WireError, WireResult};
pub use message::{
    AttachPayload, CountermeasureSettings, Envelope, IffSettings, LockEntry, LogicKind,
    MessageBody, SearchSettings, SensorSettings, TrackerMirror, UpdatePayload,
};
