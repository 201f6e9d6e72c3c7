//! World object table.
//!
//! # Design
//!
//! The host engine owns the real game world; this table is the runtime's
//! view of it — one `ObjectHandle` per object the framework cares about,
//! keyed by the host-minted `EntityId`.  Handles carry only what the
//! framework reads: a display name, world pose, and the owning structure's
//! bounding radius.
//!
//! Object removal is reported as a drained event queue rather than a
//! callback: `despawn` records the ID, and the owning endpoint drains the
//! queue once per tick to close any attached logic.  Within a tick the
//! departed handle is already gone from lookups.

use rustc_hash::FxHashMap;

use gw_core::{EntityId, Vec3};

use crate::mount::{MountDef, MountState, SensorMount};
use crate::{WorldError, WorldResult};

/// The runtime's view of one world object.
#[derive(Clone, Debug)]
pub struct ObjectHandle {
    pub entity: EntityId,
    /// Host-assigned display name, for logs only.
    pub name: String,
    /// World-space position, meters.
    pub position: Vec3,
    /// World-space velocity, meters per second.
    pub velocity: Vec3,
    /// Radius of the sphere bounding the owning structure.  For a block this
    /// is the radius of the structure it is mounted on, not the block itself.
    pub bounding_radius: f64,
}

impl ObjectHandle {
    /// A stationary object with the given pose.
    pub fn fixed(entity: EntityId, name: impl Into<String>, position: Vec3, radius: f64) -> Self {
        Self {
            entity,
            name: name.into(),
            position,
            velocity: Vec3::ZERO,
            bounding_radius: radius.max(0.0),
        }
    }
}

/// Table of live world objects plus sensor mount state.
#[derive(Default)]
pub struct WorldModel {
    objects:  FxHashMap<EntityId, ObjectHandle>,
    mounts:   FxHashMap<EntityId, SensorMount>,
    removals: Vec<EntityId>,
}

impl WorldModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object.  IDs are never reused by the host, so a
    /// replacement means the host re-announced an object we already track.
    pub fn spawn(&mut self, handle: ObjectHandle) {
        if self.objects.insert(handle.entity, handle).is_some() {
            log::warn!("spawn replaced an existing object");
        }
    }

    /// Remove an object and queue a removal event for the endpoint to drain.
    /// Returns `false` if the ID was not present.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let existed = self.objects.remove(&entity).is_some();
        self.mounts.remove(&entity);
        if existed {
            self.removals.push(entity);
        }
        existed
    }

    #[inline]
    pub fn resolve(&self, entity: EntityId) -> Option<&ObjectHandle> {
        self.objects.get(&entity)
    }

    #[inline]
    pub fn resolve_mut(&mut self, entity: EntityId) -> Option<&mut ObjectHandle> {
        self.objects.get_mut(&entity)
    }

    #[inline]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.objects.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectHandle> {
        self.objects.values()
    }

    /// Take the removal events recorded since the last drain.
    pub fn drain_removals(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.removals)
    }

    /// Drop every object and mount, queueing removals for all of them.
    pub fn clear(&mut self) {
        self.removals.extend(self.objects.keys().copied());
        self.objects.clear();
        self.mounts.clear();
    }

    // ── Mounts ────────────────────────────────────────────────────────────

    /// Attach a directional mount to an existing object.  The definition is
    /// validated here so engine code downstream can trust stored defs.
    pub fn add_mount(&mut self, entity: EntityId, def: MountDef) -> WorldResult<()> {
        if !self.objects.contains_key(&entity) {
            return Err(WorldError::UnknownObject(entity));
        }
        def.validate().map_err(|reason| WorldError::InvalidMount { entity, reason })?;
        let state = MountState::at_home(&def);
        self.mounts.insert(entity, SensorMount { def, state });
        Ok(())
    }

    #[inline]
    pub fn mount(&self, entity: EntityId) -> Option<&SensorMount> {
        self.mounts.get(&entity)
    }

    #[inline]
    pub fn mount_mut(&mut self, entity: EntityId) -> Option<&mut SensorMount> {
        self.mounts.get_mut(&entity)
    }
}
