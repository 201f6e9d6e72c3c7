//! `LossyLink` — deterministic in-memory network between endpoints.
//!
//! # Model
//!
//! Frames submitted during tick N are held in a due-queue keyed by delivery
//! tick and released at the start of a later tick, so a frame is never
//! processed in the tick it was sent.  Per frame the link rolls, in order:
//! a drop chance, a duplicate chance, and a uniform delay in
//! `[min_delay_ticks, max_delay_ticks]`; a duplicate gets its own delay roll
//! and may overtake the original.
//!
//! All randomness comes from one `SimRng`, so a given seed reproduces the
//! exact same drops, duplicates, and arrival order across runs.
//!
//! # Performance note
//!
//! `BTreeMap` gives O(log W) insert where W = number of distinct delivery
//! ticks currently in flight.  With delays of a few ticks W stays in the
//! single digits, so the constant is tiny.

use std::collections::BTreeMap;
use std::fmt;

use gw_core::{PeerId, SimRng, Tick};
use gw_net::FrameTransport;

// ── Configuration ────────────────────────────────────────────────────────────

/// Loss and latency parameters for a [`LossyLink`].
///
/// The default is a perfect LAN: no loss, no duplication, every frame
/// delivered on the next tick.
#[derive(Clone, Debug)]
pub struct LinkConfig {
    /// Probability in `[0, 1]` that a submitted frame is silently discarded.
    pub drop_chance: f64,
    /// Probability in `[0, 1]` that a frame arrives twice.
    pub duplicate_chance: f64,
    /// Minimum delivery delay in ticks.  Must be at least 1.
    pub min_delay_ticks: u64,
    /// Maximum delivery delay in ticks.  Must be `>= min_delay_ticks`.
    pub max_delay_ticks: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            drop_chance:      0.0,
            duplicate_chance: 0.0,
            min_delay_ticks:  1,
            max_delay_ticks:  1,
        }
    }
}

impl LinkConfig {
    /// Check parameters for internal consistency.
    pub fn validate(&self) -> Result<(), String> {
        if !self.drop_chance.is_finite() || !(0.0..=1.0).contains(&self.drop_chance) {
            return Err(format!("drop_chance {} outside [0, 1]", self.drop_chance));
        }
        if !self.duplicate_chance.is_finite() || !(0.0..=1.0).contains(&self.duplicate_chance) {
            return Err(format!(
                "duplicate_chance {} outside [0, 1]",
                self.duplicate_chance
            ));
        }
        if self.min_delay_ticks == 0 {
            return Err("min_delay_ticks must be at least 1".to_string());
        }
        if self.max_delay_ticks < self.min_delay_ticks {
            return Err(format!(
                "max_delay_ticks {} below min_delay_ticks {}",
                self.max_delay_ticks, self.min_delay_ticks
            ));
        }
        Ok(())
    }
}

// ── Statistics ───────────────────────────────────────────────────────────────

/// Running frame counters for one link.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Frames submitted by endpoints.
    pub sent: u64,
    /// Frames handed to a receiving endpoint (duplicates counted each time).
    pub delivered: u64,
    /// Frames discarded by the drop roll.
    pub dropped: u64,
    /// Extra copies created by the duplicate roll.
    pub duplicated: u64,
}

impl fmt::Display for LinkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent {}, delivered {}, dropped {}, duplicated {}",
            self.sent, self.delivered, self.dropped, self.duplicated
        )
    }
}

// ── Link ─────────────────────────────────────────────────────────────────────

struct InFlight {
    from:  PeerId,
    to:    PeerId,
    bytes: Vec<u8>,
}

/// Deterministic lossy frame carrier between session endpoints.
pub struct LossyLink {
    config:    LinkConfig,
    rng:       SimRng,
    in_flight: BTreeMap<Tick, Vec<InFlight>>,
    stats:     LinkStats,
}

impl LossyLink {
    /// Create a link with the given parameters and its own RNG stream.
    pub fn new(config: LinkConfig, rng: SimRng) -> Self {
        Self {
            config,
            rng,
            in_flight: BTreeMap::new(),
            stats: LinkStats::default(),
        }
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Frames currently queued for future delivery.
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.values().map(Vec::len).sum()
    }

    /// Submit one frame for delayed delivery.  Called during tick `now`; the
    /// frame becomes visible to the receiver no earlier than `now + 1`.
    pub fn submit(&mut self, from: PeerId, to: PeerId, bytes: Vec<u8>, now: Tick) {
        self.stats.sent += 1;
        if self.rng.gen_bool(self.config.drop_chance) {
            self.stats.dropped += 1;
            log::trace!("link dropped {} byte(s) {from} -> {to}", bytes.len());
            return;
        }
        if self.rng.gen_bool(self.config.duplicate_chance) {
            self.stats.duplicated += 1;
            let due = self.due_tick(now);
            self.enqueue(due, InFlight { from, to, bytes: bytes.clone() });
        }
        let due = self.due_tick(now);
        self.enqueue(due, InFlight { from, to, bytes });
    }

    /// Release every frame due at exactly `now`, in submission order per due
    /// tick, routing each to its receiver.
    ///
    /// The session loop calls this once per tick with a monotonically
    /// increasing `now`, so no due tick is ever skipped.
    pub fn deliver_due(&mut self, now: Tick, mut route: impl FnMut(PeerId, PeerId, Vec<u8>)) {
        let Some(due) = self.in_flight.remove(&now) else {
            return;
        };
        self.stats.delivered += due.len() as u64;
        for frame in due {
            route(frame.from, frame.to, frame.bytes);
        }
    }

    fn due_tick(&mut self, now: Tick) -> Tick {
        let delay = self
            .rng
            .gen_range(self.config.min_delay_ticks..=self.config.max_delay_ticks);
        now.offset(delay)
    }

    fn enqueue(&mut self, due: Tick, frame: InFlight) {
        self.in_flight.entry(due).or_default().push(frame);
    }
}

// ── Transport adapter ────────────────────────────────────────────────────────

/// Borrow of a [`LossyLink`] that satisfies [`FrameTransport`] for one
/// endpoint's flush call.
///
/// `FrameTransport` carries only the destination; the adapter pins the
/// sending peer and the current tick so the link can tag and schedule the
/// frame.
pub struct LinkTransport<'a> {
    link: &'a mut LossyLink,
    from: PeerId,
    now:  Tick,
}

impl<'a> LinkTransport<'a> {
    pub fn new(link: &'a mut LossyLink, from: PeerId, now: Tick) -> Self {
        Self { link, from, now }
    }
}

impl FrameTransport for LinkTransport<'_> {
    fn send(&mut self, to: PeerId, frame: Vec<u8>) {
        self.link.submit(self.from, to, frame, self.now);
    }
}
