//! Typed synchronization messages.
//!
//! # Design
//!
//! Every message names a world object (`Envelope::entity`) and carries one of
//! three bodies: an attach request (client asks the server to describe the
//! logic on that object), an attach response (server's full snapshot, enough
//! to construct a mirror), or a state update (delta both directions,
//! latest-state-wins).  Payloads are tagged enums rather than opaque bytes,
//! so routing can match on the variant and the compiler checks exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;

use gw_core::EntityId;

/// The closed set of logic kinds that can ride on a world object.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum LogicKind {
    SensorView,
    CountermeasureView,
    Tracker,
    SearchDirector,
    IffReflector,
}

impl LogicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicKind::SensorView         => "sensor-view",
            LogicKind::CountermeasureView => "countermeasure-view",
            LogicKind::Tracker            => "tracker",
            LogicKind::SearchDirector     => "search-director",
            LogicKind::IffReflector       => "iff-reflector",
        }
    }
}

impl fmt::Display for LogicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Settings payloads ─────────────────────────────────────────────────────────

/// Operator-adjustable state of a directable sensor.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SensorSettings {
    pub active: bool,
    /// Detection range in meters; the server clamps this to hardware limits.
    pub range_m: f64,
    /// Receiver gain multiplier, `[0.1, 10.0]` after server clamping.
    pub gain: f64,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self { active: true, range_m: 2_000.0, gain: 1.0 }
    }
}

impl SensorSettings {
    /// Hard hardware limits applied server-side before any rebroadcast.
    pub fn clamped(&self) -> Self {
        Self {
            active:  self.active,
            range_m: self.range_m.clamp(0.0, 50_000.0),
            gain:    self.gain.clamp(0.1, 10.0),
        }
    }
}

/// Operator-adjustable state of a countermeasure dispenser.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CountermeasureSettings {
    pub armed: bool,
    /// Charges released per salvo, clamped to the magazine feed limit.
    pub salvo: u32,
    pub interval_secs: f64,
}

impl Default for CountermeasureSettings {
    fn default() -> Self {
        Self { armed: false, salvo: 2, interval_secs: 5.0 }
    }
}

impl CountermeasureSettings {
    pub fn clamped(&self) -> Self {
        Self {
            armed:         self.armed,
            salvo:         self.salvo.clamp(1, 8),
            interval_secs: self.interval_secs.clamp(0.5, 60.0),
        }
    }
}

/// Operator-adjustable sector scan parameters for a search director.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SearchSettings {
    pub enabled: bool,
    pub center_azimuth_rad: f64,
    pub sweep_half_angle_rad: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            center_azimuth_rad: 0.0,
            sweep_half_angle_rad: std::f64::consts::FRAC_PI_2,
        }
    }
}

impl SearchSettings {
    pub fn clamped(&self) -> Self {
        use std::f64::consts::PI;
        Self {
            enabled: self.enabled,
            center_azimuth_rad: if self.center_azimuth_rad.is_finite() {
                self.center_azimuth_rad.clamp(-PI, PI)
            } else {
                0.0
            },
            sweep_half_angle_rad: if self.sweep_half_angle_rad.is_finite() {
                self.sweep_half_angle_rad.clamp(0.0, PI)
            } else {
                PI
            },
        }
    }
}

/// Identity codes an IFF reflector squawks.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct IffSettings {
    pub codes: Vec<String>,
}

impl IffSettings {
    /// Transponder hardware limits: at most 8 codes of 24 characters each.
    pub fn clamped(&self) -> Self {
        let codes = self
            .codes
            .iter()
            .take(8)
            .map(|c| c.chars().take(24).collect())
            .collect();
        Self { codes }
    }
}

// ── Tracker payloads ──────────────────────────────────────────────────────────

/// One sensor's current lock, as mirrored to clients.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LockEntry {
    pub sensor: EntityId,
    pub target: Option<EntityId>,
}

/// Full lock table snapshot, sent when a tracker mirror attaches.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct TrackerMirror {
    pub locks: Vec<LockEntry>,
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// Snapshot payload of an attach response — everything a client needs to
/// construct a mirror of the named logic.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum AttachPayload {
    Sensor(SensorSettings),
    Countermeasure(CountermeasureSettings),
    Tracker(TrackerMirror),
    Search(SearchSettings),
    Iff(IffSettings),
}

impl AttachPayload {
    pub fn kind(&self) -> LogicKind {
        match self {
            AttachPayload::Sensor(_)         => LogicKind::SensorView,
            AttachPayload::Countermeasure(_) => LogicKind::CountermeasureView,
            AttachPayload::Tracker(_)        => LogicKind::Tracker,
            AttachPayload::Search(_)         => LogicKind::SearchDirector,
            AttachPayload::Iff(_)            => LogicKind::IffReflector,
        }
    }
}

/// Delta payload of a state update, flowing either direction.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum UpdatePayload {
    Sensor(SensorSettings),
    Countermeasure(CountermeasureSettings),
    /// Authoritative lock change, server to clients only.
    TrackerLock(LockEntry),
    Search(SearchSettings),
    Iff(IffSettings),
}

impl UpdatePayload {
    pub fn kind(&self) -> LogicKind {
        match self {
            UpdatePayload::Sensor(_)         => LogicKind::SensorView,
            UpdatePayload::Countermeasure(_) => LogicKind::CountermeasureView,
            UpdatePayload::TrackerLock(_)    => LogicKind::Tracker,
            UpdatePayload::Search(_)         => LogicKind::SearchDirector,
            UpdatePayload::Iff(_)            => LogicKind::IffReflector,
        }
    }
}

/// Body of one sync message.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum MessageBody {
    /// Client asks the server to describe the logic of `kind` on the object.
    AttachRequest { kind: LogicKind },
    /// Server's snapshot reply; also sent unsolicited to prime new peers.
    AttachResponse(AttachPayload),
    /// Latest-state-wins delta.
    StateUpdate(UpdatePayload),
}

/// One sync message: a world object plus a typed body.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub entity: EntityId,
    pub body: MessageBody,
}

impl Envelope {
    pub fn new(entity: EntityId, body: MessageBody) -> Self {
        Self { entity, body }
    }

    /// The logic kind this message addresses.
    pub fn kind(&self) -> LogicKind {
        match &self.body {
            MessageBody::AttachRequest { kind } => *kind,
            MessageBody::AttachResponse(p)      => p.kind(),
            MessageBody::StateUpdate(p)         => p.kind(),
        }
    }
}
