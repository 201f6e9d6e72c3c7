//! Session time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter advanced
//! by the host game loop.  The mapping to real seconds is held in `TickClock`:
//!
//!   elapsed = tick / ticks_per_second
//!
//! Using an integer tick as the canonical time unit means all delivery and
//! decay arithmetic is exact (no floating-point drift) and comparisons are
//! O(1).  Fractional budgets (lock decay, sweep motion) convert through
//! `secs_per_tick()` at the point of use.
//!
//! The default rate is 60 ticks per simulated second, matching the host
//! engine's update loop; the rest of the framework is agnostic.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute session tick counter.
///
/// Stored as `u64` to avoid overflow: at 60 ticks/second a u64 lasts
/// ~9.7 billion years, far longer than any conceivable session.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ────────────────────────────────────────────────────────────────

/// Converts between tick counts and elapsed seconds.
///
/// `TickClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    /// Update rate of the host loop.  Default: 60.
    pub ticks_per_second: u32,
    /// The current tick — advanced by `TickClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl TickClock {
    /// Create a clock at tick 0 with the given update rate.
    /// A rate of 0 is treated as 1 so time always moves.
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            ticks_per_second: ticks_per_second.max(1),
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Real seconds one tick represents.
    #[inline]
    pub fn secs_per_tick(&self) -> f64 {
        1.0 / self.ticks_per_second as f64
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.secs_per_tick()
    }

    /// How many ticks span `secs` seconds?  Rounds up, so a converted
    /// duration is never shorter than the one asked for.
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs.max(0.0) * self.ticks_per_second as f64).ceil() as u64
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}
