//! Per-tick contention bookkeeping.
//!
//! The tally is rebuilt from the candidate set every tick and incremented as
//! sensors claim targets during the same pass, so a sensor processed later
//! sees the claims of every sensor processed before it.  That ordering is
//! what spreads a battery across multiple contacts instead of piling every
//! sensor onto the first one.

use rustc_hash::FxHashMap;

use gw_core::EntityId;

/// How many sensors have claimed each candidate so far this tick.
#[derive(Debug, Default)]
pub struct ContentionTally {
    counts: FxHashMap<EntityId, u32>,
}

impl ContentionTally {
    /// Start a tick with every candidate at zero claims.
    pub fn for_candidates(candidates: impl Iterator<Item = EntityId>) -> Self {
        let mut counts = FxHashMap::default();
        for id in candidates {
            counts.insert(id, 0);
        }
        Self { counts }
    }

    /// Claims recorded against `id`.  Non-candidates report 0.
    #[inline]
    pub fn count(&self, id: EntityId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Record one claim against `id`.
    pub fn claim(&mut self, id: EntityId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    /// The lowest claim count across all candidates; 0 for an empty tally.
    pub fn global_min(&self) -> u32 {
        self.counts.values().copied().min().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
