//! `gw-sim` — deterministic session harness for the gridwatch runtime.
//!
//! # Six-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Deliver   — release link frames due this tick into endpoint
//!                 ingress queues.
//!   ② Contacts  — sample scripted tracks into the tick's detection feed.
//!   ③ Server    — apply queued frames, tick authority logic, report lock
//!                 transitions to the observer.
//!   ④ Flush     — per-peer server batches become frames on the link.
//!   ⑤ Clients   — re-request missing mirrors, tick each endpoint, flush
//!                 (wire clients → link, loopback client → server).
//!   ⑥ Host      — hand locally-addressed envelopes to the loopback
//!                 client, closing singleplayer round trips in-tick.
//! ```
//!
//! The whole harness is deterministic: one root seed derives every RNG
//! stream, so a given configuration replays the same drops, delays, and
//! lock transitions on every run.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gw_sim::{LinkConfig, NetSimBuilder, NoopNetObserver, SimConfig};
//! use gw_world::OpenField;
//!
//! let mut sim = NetSimBuilder::new(SimConfig::default(), OpenField)
//!     .server_world(world)
//!     .server_logic(turret, BlockLogic::Tracker(tracker))
//!     .client(PeerId(1), Vec3::ZERO, client_world, vec![(turret, LogicKind::Tracker)])
//!     .link(LinkConfig { drop_chance: 0.2, ..LinkConfig::default() })
//!     .scenario(load_tracks_csv(path)?)
//!     .build()?;
//! sim.run(&mut NoopNetObserver);
//! ```

pub mod builder;
pub mod error;
pub mod link;
pub mod lock_log;
pub mod observer;
pub mod scenario;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::NetSimBuilder;
pub use error::{SimError, SimResult};
pub use link::{LinkConfig, LinkStats, LinkTransport, LossyLink};
pub use lock_log::LockLogger;
pub use observer::{NetObserver, NoopNetObserver};
pub use scenario::{load_tracks_csv, load_tracks_reader, Scenario, ScriptedTrack};
pub use sim::{NetSim, SimClient, SimConfig};
