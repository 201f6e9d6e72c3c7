//! Tracker logic — authoritative selection on the server, lock mirror on
//! clients.

use rustc_hash::FxHashMap;

use gw_core::EntityId;
use gw_tracker::{LockEvent, LockState, SelectionEngine, TrackerConfig};
use gw_wire::{LockEntry, TrackerMirror, UpdatePayload};

use crate::context::TickContext;
use crate::effect::Effect;

/// Runs target selection over a set of controlled sensors (authority), or
/// mirrors the server's lock table (client).
///
/// Only the authority side ever runs the engine; a mirror's lock table is
/// write-only from the network.  Lock claims arriving at an authority are
/// rejected — the engine is the single source of lock truth.
#[derive(Debug)]
pub struct TrackerLogic {
    authority: bool,
    engine: SelectionEngine,
    sensors: Vec<EntityId>,
    locks: FxHashMap<EntityId, LockState>,
}

impl TrackerLogic {
    /// Server-side instance controlling `sensors`, in processing order.
    pub fn authority(config: TrackerConfig, sensors: Vec<EntityId>) -> Self {
        Self {
            authority: true,
            engine: SelectionEngine::new(config),
            sensors,
            locks: FxHashMap::default(),
        }
    }

    /// Client-side mirror primed from an attach snapshot.
    pub fn mirror(snapshot: &TrackerMirror) -> Self {
        let mut locks = FxHashMap::default();
        for entry in &snapshot.locks {
            if let Some(target) = entry.target {
                locks.insert(entry.sensor, LockState { target, decay_left_secs: 0.0 });
            }
        }
        Self {
            authority: false,
            engine: SelectionEngine::default(),
            sensors: Vec::new(),
            locks,
        }
    }

    #[inline]
    pub fn is_authority(&self) -> bool {
        self.authority
    }

    #[inline]
    pub fn sensors(&self) -> &[EntityId] {
        &self.sensors
    }

    /// Current lock of one sensor, if any.
    pub fn lock_on(&self, sensor: EntityId) -> Option<EntityId> {
        self.locks.get(&sensor).map(|l| l.target)
    }

    /// Snapshot of the lock table, sorted by sensor for determinism.
    pub fn lock_table(&self) -> Vec<LockEntry> {
        let mut entries: Vec<LockEntry> = self
            .locks
            .iter()
            .map(|(&sensor, state)| LockEntry { sensor, target: Some(state.target) })
            .collect();
        entries.sort_by_key(|e| e.sensor);
        entries
    }

    /// Replace the controlled-sensor set.  All existing locks are cleared;
    /// the returned release events let the owner tell mirrors.
    pub fn set_sensors(&mut self, sensors: Vec<EntityId>) -> Vec<LockEvent> {
        let mut released: Vec<(EntityId, EntityId)> =
            self.locks.iter().map(|(&s, l)| (s, l.target)).collect();
        released.sort();
        self.locks.clear();
        self.sensors = sensors;
        released
            .into_iter()
            .map(|(sensor, target)| LockEvent {
                sensor,
                previous: Some(target),
                current: None,
            })
            .collect()
    }

    pub fn tick(&mut self, ctx: &TickContext<'_>) -> Vec<Effect> {
        if !self.authority {
            return Vec::new();
        }
        let outcome = self.engine.tick(
            ctx.world,
            &self.sensors,
            &mut self.locks,
            ctx.detections,
            ctx.oracle,
            ctx.dt_secs,
        );
        let mut effects: Vec<Effect> = outcome
            .commands
            .into_iter()
            .map(|(sensor, command)| Effect::Aim { sensor, command })
            .collect();
        effects.extend(outcome.events.into_iter().map(Effect::LockChanged));
        effects
    }

    pub fn apply(&mut self, payload: &UpdatePayload) -> bool {
        match payload {
            UpdatePayload::TrackerLock(entry) => {
                if self.authority {
                    // Lock truth flows outward only.
                    return false;
                }
                match entry.target {
                    Some(target) => {
                        self.locks
                            .insert(entry.sensor, LockState { target, decay_left_secs: 0.0 });
                    }
                    None => {
                        self.locks.remove(&entry.sensor);
                    }
                }
                true
            }
            _ => false,
        }
    }

    pub fn close(&mut self) {
        self.locks.clear();
        self.sensors.clear();
    }
}
