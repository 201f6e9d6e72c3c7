//! Behavior logic attached to world objects.
//!
//! | Module           | Provides                                             |
//! |------------------|------------------------------------------------------|
//! | `block`          | [`BlockLogic`] closed enum and its dispatch surface  |
//! | `context`        | [`TickContext`] read-only per-tick inputs            |
//! | `effect`         | [`Effect`] outputs handed back to the endpoint       |
//! | `sensor`         | sensor settings view                                 |
//! | `countermeasure` | countermeasure settings view                         |
//! | `tracker`        | lock authority / mirror around the selection engine  |
//! | `search`         | sector sweep director for idle sensors               |
//! | `iff`            | transponder code reflector                           |
//!
//! # Design
//!
//! Logic never touches the network.  Each tick the owning endpoint builds a
//! [`TickContext`] over the world snapshot, runs every open registration,
//! and collects [`Effect`]s: aim commands to apply to mounts and lock
//! transitions to broadcast.  Incoming state flows the other way through
//! `apply_update`, which merges or refuses but never errors.  Authority
//! lives server side; client mirrors hold the last accepted state and
//! produce no effects.

pub mod block;
pub mod context;
pub mod countermeasure;
pub mod effect;
pub mod iff;
pub mod search;
pub mod sensor;
pub mod tracker;

pub use block::BlockLogic;
pub use context::TickContext;
pub use countermeasure::CountermeasureView;
pub use effect::Effect;
pub use iff::IffReflector;
pub use search::SearchDirector;
pub use sensor::SensorView;
pub use tracker::TrackerLogic;
