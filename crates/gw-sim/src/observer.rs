//! Session observer trait for progress reporting and data collection.

use gw_core::Tick;
use gw_tracker::LockEvent;

use crate::link::LinkStats;

/// Callbacks invoked by [`NetSim::run`][crate::NetSim::run] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — lock transition printer
///
/// ```rust,ignore
/// struct LockPrinter;
///
/// impl NetObserver for LockPrinter {
///     fn on_lock_event(&mut self, tick: Tick, event: &LockEvent) {
///         println!("{tick}: sensor {} -> {:?}", event.sensor, event.current);
///     }
/// }
/// ```
pub trait NetObserver {
    /// Called at the very start of each tick, before link delivery.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per lock transition the server's trackers produced this
    /// tick, in the order they occurred.
    fn on_lock_event(&mut self, _tick: Tick, _event: &LockEvent) {}

    /// Called at the end of each tick with the link's running counters.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &LinkStats) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`NetObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopNetObserver;

impl NetObserver for NoopNetObserver {}
