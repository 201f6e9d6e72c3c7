//! `gw-core` — foundational types for the `gridwatch` sensor network runtime.
//!
//! This crate is a dependency of every other `gw-*` crate.  It intentionally
//! has no `gw-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `EntityId`, `PeerId`                                    |
//! | [`vec`]       | `Vec3` world-space vector math                          |
//! | [`time`]      | `Tick`, `TickClock`                                     |
//! | [`rng`]       | `SimRng` deterministic session RNG                      |
//! | [`detection`] | `FusedDetection`, `DetectionKind`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                                  |
//! |---------|-------------------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types; required by `gw-wire`. |

pub mod detection;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vec;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use detection::{DetectionKind, FusedDetection};
pub use ids::{EntityId, PeerId};
pub use rng::SimRng;
pub use time::{Tick, TickClock};
pub use vec::Vec3;
