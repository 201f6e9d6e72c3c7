//! `gw-tracker` — contention-spread target selection for directional sensors.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`config`]     | `TrackerConfig` — hold time, friendly filter            |
//! | [`contention`] | `ContentionTally` — per-tick claim counts               |
//! | [`lock`]       | `LockState`, `LockEvent`                                |
//! | [`select`]     | `SelectionEngine` — the per-tick selection pass         |
//!
//! # Selection model
//!
//! The engine spreads a battery of sensors across the tick's fused contact
//! picture: each claim raises the target's contention count, later sensors
//! prefer quieter targets, and a short decay budget keeps a momentarily lost
//! target from being dropped instantly.  See [`select`] for the full rules.

pub mod config;
pub mod contention;
pub mod lock;
pub mod select;


pub use config::TrackerConfig;
pub use contention::ContentionTally;
pub use lock::{LockEvent, LockState};
pub use select::{SelectionEngine, SelectionOutcome};
