//! Identity-keyed logic registry with deferred attachment.
//!
//! # Design
//!
//! An endpoint registers logics against entity ids that may not resolve yet
//! (a registration can race the spawn message that creates its object).
//! Unresolvable registrations queue as pending attachments and are retried
//! once per tick, FIFO, before any of that tick's updates are processed.
//! Updates arriving for a kind with no attached logic buffer the same way
//! and replay, in arrival order, when a matching logic attaches.
//!
//! Nothing here returns errors.  An unresolved reference degrades to a
//! pending entry, a refused update is dropped, and a double close is a
//! no-op; payloads are only lost when their entity is explicitly closed.

use std::collections::{BTreeMap, VecDeque};

use rustc_hash::FxHashMap;

use gw_core::EntityId;
use gw_logic::{BlockLogic, Effect, TickContext};
use gw_wire::{LogicKind, UpdatePayload};
use gw_world::{ObjectHandle, WorldModel};

/// Outcome of a [`LogicRegistry::register`] call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Registered {
    /// The backing object resolved; the logic is live.
    Attached,
    /// The backing object does not exist locally yet; the logic is queued
    /// and will attach on a later tick when the object appears.
    Deferred,
}

/// Outcome of routing one incoming update through the registry.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UpdateOutcome {
    /// A matching logic accepted and merged the payload.
    Applied,
    /// A matching logic exists but vetoed the payload.  The update is
    /// dropped, not buffered.
    Refused,
    /// No attached logic matches the payload kind; the update is held until
    /// one attaches.
    Buffered,
}

struct PendingAttach {
    entity: EntityId,
    logic:  BlockLogic,
}

/// All logics attached (or waiting to attach) on one endpoint.
///
/// Owned outright by the endpoint's tick thread.  Off-thread frame delivery
/// marshals through the ingress queue instead of touching this directly, so
/// exclusive ownership is the whole synchronization story.
#[derive(Default)]
pub struct LogicRegistry {
    /// Attached logics per entity, in attach order.  `BTreeMap` so tick and
    /// iteration order is the entity order, independent of insert history.
    slots: BTreeMap<EntityId, Vec<BlockLogic>>,
    pending_attach:  VecDeque<PendingAttach>,
    pending_updates: FxHashMap<EntityId, Vec<UpdatePayload>>,
}

impl LogicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `logic` to `entity`, deferring when the object is not in
    /// `world` yet.  A deferred registration is retried by
    /// [`drain_pending_attachments`][Self::drain_pending_attachments]; it
    /// never expires on its own.
    pub fn register(
        &mut self,
        world: &WorldModel,
        entity: EntityId,
        logic: BlockLogic,
    ) -> Registered {
        match world.resolve(entity) {
            Some(object) => {
                self.attach(entity, logic, object);
                Registered::Attached
            }
            None => {
                log::debug!("{} registration for {} deferred", logic.kind(), entity);
                self.pending_attach.push_back(PendingAttach { entity, logic });
                Registered::Deferred
            }
        }
    }

    /// Retry every pending attachment, oldest first.  Call once per tick
    /// before processing that tick's frames, so a registration queued in
    /// tick N attaches before tick N+1's updates route.  Returns how many
    /// attached.
    pub fn drain_pending_attachments(&mut self, world: &WorldModel) -> usize {
        let mut still_pending = VecDeque::with_capacity(self.pending_attach.len());
        let mut attached = 0;
        while let Some(pending) = self.pending_attach.pop_front() {
            match world.resolve(pending.entity) {
                Some(object) => {
                    self.attach(pending.entity, pending.logic, object);
                    attached += 1;
                }
                None => still_pending.push_back(pending),
            }
        }
        self.pending_attach = still_pending;
        attached
    }

    /// Route an update to the first attached logic of the payload's kind.
    ///
    /// With no kind match the payload buffers for a future attach.  When
    /// several logics of one kind share an entity, the earliest attached one
    /// receives every update for that kind.
    pub fn apply_or_buffer(&mut self, entity: EntityId, payload: UpdatePayload) -> UpdateOutcome {
        if let Some(slots) = self.slots.get_mut(&entity) {
            if let Some(logic) = slots.iter_mut().find(|l| l.kind() == payload.kind()) {
                return if logic.apply_update(&payload) {
                    UpdateOutcome::Applied
                } else {
                    log::debug!("{} update refused on {}", payload.kind(), entity);
                    UpdateOutcome::Refused
                };
            }
        }
        self.pending_updates.entry(entity).or_default().push(payload);
        UpdateOutcome::Buffered
    }

    /// Close every logic attached to `entity` and forget its pending state.
    /// Closing an unknown or already-closed entity is a no-op.
    pub fn close(&mut self, entity: EntityId) {
        if let Some(slots) = self.slots.remove(&entity) {
            for mut logic in slots {
                logic.on_close(entity);
            }
        }
        self.pending_attach.retain(|p| p.entity != entity);
        self.pending_updates.remove(&entity);
    }

    /// Full teardown for world unload.
    pub fn close_all(&mut self) {
        for (entity, slots) in std::mem::take(&mut self.slots) {
            for mut logic in slots {
                logic.on_close(entity);
            }
        }
        self.pending_attach.clear();
        self.pending_updates.clear();
    }

    /// First attached logic of `kind` on `entity`, if any.
    pub fn lookup(&self, entity: EntityId, kind: LogicKind) -> Option<&BlockLogic> {
        self.slots
            .get(&entity)?
            .iter()
            .find(|l| l.kind() == kind)
    }

    pub fn lookup_mut(&mut self, entity: EntityId, kind: LogicKind) -> Option<&mut BlockLogic> {
        self.slots
            .get_mut(&entity)?
            .iter_mut()
            .find(|l| l.kind() == kind)
    }

    /// Tick every attached logic in entity order.  Effects come back tagged
    /// with the entity whose logic produced them, so the endpoint can
    /// address follow-up traffic.
    pub fn tick_all(&mut self, ctx: &TickContext<'_>) -> Vec<(EntityId, Effect)> {
        let mut effects = Vec::new();
        for (&entity, slots) in self.slots.iter_mut() {
            for logic in slots {
                effects.extend(logic.tick(ctx).into_iter().map(|e| (entity, e)));
            }
        }
        effects
    }

    /// Every attached logic, in entity order then attach order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &BlockLogic)> {
        self.slots
            .iter()
            .flat_map(|(&entity, slots)| slots.iter().map(move |l| (entity, l)))
    }

    pub fn attached_len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn pending_attach_len(&self) -> usize {
        self.pending_attach.len()
    }

    pub fn pending_update_len(&self) -> usize {
        self.pending_updates.values().map(Vec::len).sum()
    }

    /// Bind a resolved logic: fire the attach callback, replay buffered
    /// updates of its kind in arrival order, then take ownership.
    fn attach(&mut self, entity: EntityId, mut logic: BlockLogic, object: &ObjectHandle) {
        logic.on_attach(object);
        if let Some(buffered) = self.pending_updates.get_mut(&entity) {
            let kind = logic.kind();
            let mut i = 0;
            while i < buffered.len() {
                if buffered[i].kind() == kind {
                    // Consumed by this attach whether or not the logic
                    // accepts it.
                    let payload = buffered.remove(i);
                    if !logic.apply_update(&payload) {
                        log::debug!("buffered {} update refused on {}", kind, entity);
                    }
                } else {
                    i += 1;
                }
            }
            if buffered.is_empty() {
                self.pending_updates.remove(&entity);
            }
        }
        self.slots.entry(entity).or_default().push(logic);
    }
}
