//! The closed set of logic variants and their dispatch surface.
//!
//! # Design
//!
//! Logic kinds form a closed enum rather than a trait-object registry: every
//! variant is known at compile time, dispatch is a `match`, and adding a
//! kind forces every call site to handle it.  Construction from a wire
//! snapshot ([`BlockLogic::from_attach`]) is likewise total — there is no
//! "unknown logic" state to represent.

use gw_core::EntityId;
use gw_wire::{AttachPayload, LogicKind, UpdatePayload};
use gw_world::ObjectHandle;

use crate::context::TickContext;
use crate::countermeasure::CountermeasureView;
use crate::effect::Effect;
use crate::iff::IffReflector;
use crate::search::SearchDirector;
use crate::sensor::SensorView;
use crate::tracker::TrackerLogic;

/// One piece of logic riding on a world object.
#[derive(Debug)]
pub enum BlockLogic {
    SensorView(SensorView),
    CountermeasureView(CountermeasureView),
    Tracker(TrackerLogic),
    SearchDirector(SearchDirector),
    IffReflector(IffReflector),
}

impl BlockLogic {
    /// The wire kind this variant answers to.
    pub fn kind(&self) -> LogicKind {
        match self {
            BlockLogic::SensorView(_)         => LogicKind::SensorView,
            BlockLogic::CountermeasureView(_) => LogicKind::CountermeasureView,
            BlockLogic::Tracker(_)            => LogicKind::Tracker,
            BlockLogic::SearchDirector(_)     => LogicKind::SearchDirector,
            BlockLogic::IffReflector(_)       => LogicKind::IffReflector,
        }
    }

    /// Construct a client mirror from a server attach snapshot.
    pub fn from_attach(payload: &AttachPayload) -> BlockLogic {
        match payload {
            AttachPayload::Sensor(s) => {
                BlockLogic::SensorView(SensorView { settings: s.clone() })
            }
            AttachPayload::Countermeasure(c) => {
                BlockLogic::CountermeasureView(CountermeasureView { settings: c.clone() })
            }
            AttachPayload::Tracker(m)  => BlockLogic::Tracker(TrackerLogic::mirror(m)),
            AttachPayload::Search(s)   => BlockLogic::SearchDirector(SearchDirector::mirror(s.clone())),
            AttachPayload::Iff(i)      => BlockLogic::IffReflector(IffReflector { settings: i.clone() }),
        }
    }

    /// Snapshot for an attach response — enough for `from_attach` to build
    /// an equivalent mirror.
    pub fn attach_payload(&self) -> AttachPayload {
        match self {
            BlockLogic::SensorView(v)         => AttachPayload::Sensor(v.settings.clone()),
            BlockLogic::CountermeasureView(v) => AttachPayload::Countermeasure(v.settings.clone()),
            BlockLogic::Tracker(t)            => AttachPayload::Tracker(gw_wire::TrackerMirror {
                locks: t.lock_table(),
            }),
            BlockLogic::SearchDirector(s)     => AttachPayload::Search(s.settings.clone()),
            BlockLogic::IffReflector(i)       => AttachPayload::Iff(i.settings.clone()),
        }
    }

    /// The canonical state to rebroadcast after a merge, if this variant has
    /// a single-update representation.  Trackers report `None`; their lock
    /// table flows through lock events instead.
    pub fn update_payload(&self) -> Option<UpdatePayload> {
        match self {
            BlockLogic::SensorView(v)         => Some(UpdatePayload::Sensor(v.settings.clone())),
            BlockLogic::CountermeasureView(v) => {
                Some(UpdatePayload::Countermeasure(v.settings.clone()))
            }
            BlockLogic::Tracker(_)            => None,
            BlockLogic::SearchDirector(s)     => Some(UpdatePayload::Search(s.settings.clone())),
            BlockLogic::IffReflector(i)       => Some(UpdatePayload::Iff(i.settings.clone())),
        }
    }

    /// Invoked when the deferred (or immediate) attach completes.
    pub fn on_attach(&mut self, object: &ObjectHandle) {
        log::debug!("{} attached to {} ({})", self.kind(), object.entity, object.name);
    }

    /// Run one tick.  Only authoritative variants produce effects.
    pub fn tick(&mut self, ctx: &TickContext<'_>) -> Vec<Effect> {
        match self {
            BlockLogic::Tracker(t)        => t.tick(ctx),
            BlockLogic::SearchDirector(s) => s.tick(ctx),
            BlockLogic::SensorView(_)
            | BlockLogic::CountermeasureView(_)
            | BlockLogic::IffReflector(_) => Vec::new(),
        }
    }

    /// Merge an incoming update.  Returns `false` when the payload variant
    /// does not belong to this logic or the logic refuses it.
    pub fn apply_update(&mut self, payload: &UpdatePayload) -> bool {
        match self {
            BlockLogic::SensorView(v)         => v.apply(payload),
            BlockLogic::CountermeasureView(v) => v.apply(payload),
            BlockLogic::Tracker(t)            => t.apply(payload),
            BlockLogic::SearchDirector(s)     => s.apply(payload),
            BlockLogic::IffReflector(i)       => i.apply(payload),
        }
    }

    /// Invoked exactly once when the registration closes.
    pub fn on_close(&mut self, entity: EntityId) {
        if let BlockLogic::Tracker(t) = self {
            t.close();
        }
        log::debug!("{} on {} closed", self.kind(), entity);
    }
}
