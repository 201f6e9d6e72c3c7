//! The per-tick target selection pass.
//!
//! # Design
//!
//! One call to [`SelectionEngine::tick`] processes every controlled sensor
//! in slice order against the tick's fused detections. The pass is pure with
//! respect to the world — it reads poses and mounts but mutates only the
//! caller's lock table, returning aim commands and lock events for the owner
//! to apply.  Keeping mutation out of the pass lets the same world snapshot
//! feed every sensor and makes the ordering rules explicit:
//!
//! 1. Candidates are the fused detections minus recognized friendlies.
//! 2. A sensor holding a lock with decay budget left re-evaluates its own
//!    target first (presence, aim envelope, contention at or below the
//!    global minimum) and keeps it without a line-of-sight recheck.
//! 3. Otherwise the sensor scans all candidates in feed order, skipping any
//!    it cannot aim at or cannot see past its own hull, and claims the one
//!    with the lowest contention count.  Ties keep the earliest candidate,
//!    so the feed's priority ordering decides.
//! 4. A claim increments the tally immediately — later sensors in the same
//!    pass see it and spread to other contacts.
//! 5. With nothing claimable the lock coasts on its decay budget, and at
//!    zero the sensor is sent home and the lock entry removed.
//!
//! Per-sensor faults (unknown object, missing or invalid mount) skip that
//! sensor only; the rest of the pass proceeds.

use rustc_hash::FxHashMap;

use gw_core::{EntityId, FusedDetection};
use gw_world::{AimCommand, AimOracle, WorldModel};

use crate::config::TrackerConfig;
use crate::contention::ContentionTally;
use crate::lock::{LockEvent, LockState};

/// Aim commands and lock transitions produced by one selection pass.
#[derive(Debug, Default)]
pub struct SelectionOutcome {
    /// Per-sensor aiming instruction for this tick, in processing order.
    pub commands: Vec<(EntityId, AimCommand)>,
    /// Acquisitions, retargets, and releases, in processing order.
    pub events: Vec<LockEvent>,
}

/// Stateless selection pass over a caller-owned lock table.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    pub config: TrackerConfig,
}

impl SelectionEngine {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// Run one selection pass.  `sensors` fixes the processing order;
    /// `detections` is the tick's fused feed, highest priority first.
    pub fn tick(
        &self,
        world: &WorldModel,
        sensors: &[EntityId],
        locks: &mut FxHashMap<EntityId, LockState>,
        detections: &[FusedDetection],
        oracle: &dyn AimOracle,
        dt_secs: f64,
    ) -> SelectionOutcome {
        let mut outcome = SelectionOutcome::default();

        let candidates: Vec<&FusedDetection> = if self.config.filters_friendlies() {
            detections
                .iter()
                .filter(|d| !d.matches_codes(&self.config.friendly_codes))
                .collect()
        } else {
            detections.iter().collect()
        };

        let mut tally = ContentionTally::for_candidates(candidates.iter().map(|d| d.entity));

        for &sensor in sensors {
            let Some(object) = world.resolve(sensor) else {
                log::warn!("selection skipped {sensor}: not in the world");
                continue;
            };
            let Some(mount) = world.mount(sensor) else {
                log::debug!("selection skipped {sensor}: no mount");
                continue;
            };
            if let Err(reason) = mount.def.validate() {
                log::warn!("selection skipped {sensor}: bad mount ({reason})");
                continue;
            }
            if mount.def.is_immobile() {
                continue;
            }

            let pos = object.position;
            let radius = object.bounding_radius;
            let prior = locks.get(&sensor).cloned();

            // Hysteresis: a still-held target wins outright if it remains
            // visible to the feed, aimable, and no busier than the quietest
            // candidate.
            let kept = prior.as_ref().filter(|p| p.decay_left_secs > 0.0).and_then(|p| {
                let d = candidates.iter().find(|d| d.entity == p.target)?;
                if !oracle.can_aim_at(pos, &mount.def, d.position) {
                    return None;
                }
                (tally.count(p.target) <= tally.global_min()).then_some(*d)
            });

            let chosen = kept.or_else(|| {
                let mut best: Option<(&FusedDetection, u32)> = None;
                for d in candidates.iter().copied() {
                    if !oracle.can_aim_at(pos, &mount.def, d.position) {
                        continue;
                    }
                    let aim_dir = (d.position - pos).normalized();
                    let origin = pos + aim_dir * radius;
                    if oracle.line_of_sight_blocked(origin, pos) {
                        continue;
                    }
                    let claims = tally.count(d.entity);
                    match best {
                        Some((_, lowest)) if claims >= lowest => {}
                        _ => best = Some((d, claims)),
                    }
                }
                best.map(|(d, _)| d)
            });

            match chosen {
                Some(d) => {
                    tally.claim(d.entity);
                    outcome.commands.push((sensor, AimCommand::Target(d.position)));
                    let previous = prior.as_ref().map(|p| p.target);
                    locks.insert(
                        sensor,
                        LockState { target: d.entity, decay_left_secs: self.config.lock_hold_secs },
                    );
                    if previous != Some(d.entity) {
                        outcome.events.push(LockEvent {
                            sensor,
                            previous,
                            current: Some(d.entity),
                        });
                    }
                }
                None => match locks.get_mut(&sensor) {
                    Some(state) => {
                        state.decay_left_secs -= dt_secs;
                        if state.decay_left_secs <= 0.0 {
                            let previous = Some(state.target);
                            locks.remove(&sensor);
                            outcome.commands.push((sensor, AimCommand::Home));
                            outcome.events.push(LockEvent { sensor, previous, current: None });
                        }
                        // Still coasting: hold orientation, no command.
                    }
                    None => outcome.commands.push((sensor, AimCommand::Home)),
                },
            }
        }

        outcome
    }
}
