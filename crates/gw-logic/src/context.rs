//! Read-only per-tick state passed to every logic callback.

use gw_core::{FusedDetection, Tick};
use gw_world::{AimOracle, WorldModel};

/// A read-only snapshot of the tick handed to
/// [`BlockLogic::tick`](crate::BlockLogic::tick).
///
/// The owning endpoint builds one context per tick and shares it immutably
/// across every attached logic, so a logic can read any object's pose but
/// mutates nothing — all wanted changes come back as
/// [`Effect`](crate::Effect)s for the endpoint to apply afterwards.
///
/// # Lifetimes
///
/// All borrows live for the duration of one tick's logic phase.  The
/// endpoint never mutates the world or detections while a context is live.
pub struct TickContext<'a> {
    /// Current session tick.
    pub tick: Tick,

    /// Seconds one tick represents.
    pub dt_secs: f64,

    /// Read-only view of the live world objects and mounts.
    pub world: &'a WorldModel,

    /// This tick's fused contact picture, highest priority first.  Empty on
    /// endpoints that have no sensing feed (clients).
    pub detections: &'a [FusedDetection],

    /// Physics oracle for aim-envelope and line-of-sight questions.
    pub oracle: &'a dyn AimOracle,
}

impl<'a> TickContext<'a> {
    /// Build a context for a single tick.
    #[inline]
    pub fn new(
        tick:       Tick,
        dt_secs:    f64,
        world:      &'a WorldModel,
        detections: &'a [FusedDetection],
        oracle:     &'a dyn AimOracle,
    ) -> Self {
        Self { tick, dt_secs, world, detections, oracle }
    }
}
