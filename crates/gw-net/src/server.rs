//! The authoritative endpoint.
//!
//! # Tick phases
//!
//! `tick` runs a fixed sequence: world removals close their registrations,
//! pending attachments retry, queued ingress frames apply, every logic
//! ticks, and the resulting effects are applied locally and fanned out.
//! The host then calls [`ServerEndpoint::flush`] to put queued frames on
//! the wire and [`ServerEndpoint::drain_local`] to hand the in-process host
//! player its envelopes.  Nothing in this sequence returns an error; faults
//! are logged and degrade to dropped frames or deferred state.

use std::collections::BTreeMap;

use gw_core::{EntityId, FusedDetection, PeerId, Tick, Vec3};
use gw_logic::{Effect, TickContext};
use gw_registry::{LogicRegistry, UpdateOutcome};
use gw_tracker::LockEvent;
use gw_wire::{decode_frame, describe_batch, encode_frame};
use gw_wire::{Envelope, LockEntry, MessageBody, UpdatePayload};
use gw_world::{AimOracle, WorldModel, slew};

use crate::ingress::{Ingress, IngressSender, RawFrame};
use crate::queue::OutboundQueue;
use crate::transport::FrameTransport;

/// Server-side tuning knobs.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Peers farther than this from a state change do not hear about it.
    pub sync_range_m: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { sync_range_m: 20_000.0 }
    }
}

/// What one server tick produced, for observers.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Lock transitions the tracker logics emitted this tick, in order.
    pub lock_events: Vec<LockEvent>,
}

struct RemotePeer {
    queue:    OutboundQueue,
    position: Vec3,
}

/// The authoritative endpoint: owns the server registry, one outbound queue
/// per connected peer, and the local outbox for an in-process host player.
pub struct ServerEndpoint {
    config:        ServerConfig,
    registry:      LogicRegistry,
    remotes:       BTreeMap<PeerId, RemotePeer>,
    host:          Option<PeerId>,
    host_position: Vec3,
    local_outbox:  Vec<Envelope>,
    ingress:       Ingress,
}

impl ServerEndpoint {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: LogicRegistry::new(),
            remotes: BTreeMap::new(),
            host: None,
            host_position: Vec3::ZERO,
            local_outbox: Vec::new(),
            ingress: Ingress::new(),
        }
    }

    // ── Peer table ────────────────────────────────────────────────────────────

    /// Add a remote peer.  Reconnecting an already-known peer keeps its
    /// queue and position.
    pub fn connect(&mut self, peer: PeerId) {
        if self.host == Some(peer) {
            log::warn!("peer {} is the host; not adding as remote", peer);
            return;
        }
        if self.remotes.contains_key(&peer) {
            log::warn!("peer {} already connected", peer);
            return;
        }
        self.remotes.insert(peer, RemotePeer { queue: OutboundQueue::default(), position: Vec3::ZERO });
    }

    /// Drop a remote peer and whatever was still queued for it.
    pub fn disconnect(&mut self, peer: PeerId) {
        if let Some(state) = self.remotes.remove(&peer) {
            if !state.queue.is_empty() {
                log::debug!("dropping {} queued message(s) for departing peer {}", state.queue.len(), peer);
            }
        }
    }

    /// Declare the in-process host player.  Messages for this identity skip
    /// the wire and surface through [`drain_local`][Self::drain_local].
    pub fn set_host(&mut self, peer: PeerId) {
        self.remotes.remove(&peer);
        self.host = Some(peer);
    }

    /// Record a peer's last known position for proximity fan-out.
    pub fn update_peer_position(&mut self, peer: PeerId, position: Vec3) {
        if self.host == Some(peer) {
            self.host_position = position;
        } else if let Some(state) = self.remotes.get_mut(&peer) {
            state.position = position;
        } else {
            log::debug!("position update for unknown peer {}", peer);
        }
    }

    pub fn remote_count(&self) -> usize {
        self.remotes.len()
    }

    // ── Registry access ───────────────────────────────────────────────────────

    pub fn registry(&self) -> &LogicRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut LogicRegistry {
        &mut self.registry
    }

    // ── Fan-out ───────────────────────────────────────────────────────────────

    /// Queue a message for one peer.  Unknown destinations drop with a log
    /// line; this protocol never errors back to the caller.
    pub fn send_to_one(&mut self, peer: PeerId, envelope: Envelope) {
        if self.host == Some(peer) {
            self.local_outbox.push(envelope);
        } else if let Some(state) = self.remotes.get_mut(&peer) {
            state.queue.push(envelope);
        } else {
            log::debug!("dropping message for unknown peer {}", peer);
        }
    }

    pub fn send_to_all(&mut self, envelope: Envelope) {
        self.fan_out_within(envelope, Vec3::ZERO, f64::INFINITY, PeerId::INVALID);
    }

    /// Queue a message for every peer whose last known position is within
    /// `range` of `origin`.
    pub fn send_to_all_within_range(&mut self, envelope: Envelope, origin: Vec3, range: f64) {
        self.fan_out_within(envelope, origin, range, PeerId::INVALID);
    }

    fn fan_out_within(&mut self, envelope: Envelope, origin: Vec3, range: f64, except: PeerId) {
        for (&peer, state) in self.remotes.iter_mut() {
            if peer == except {
                continue;
            }
            if state.position.distance(origin) <= range {
                state.queue.push(envelope.clone());
            }
        }
        if let Some(host) = self.host {
            if host != except && self.host_position.distance(origin) <= range {
                // The local path has no dedup; repeated sends are absorbed
                // by latest-state-wins application.
                self.local_outbox.push(envelope);
            }
        }
    }

    // ── Ingress ───────────────────────────────────────────────────────────────

    /// Handle for delivery threads; drained at the top of [`tick`][Self::tick].
    pub fn ingress(&self) -> IngressSender {
        self.ingress.sender()
    }

    /// Apply envelopes from the in-process host client, skipping the wire.
    pub fn receive_local(&mut self, from: PeerId, envelopes: Vec<Envelope>, world: &WorldModel) {
        for envelope in envelopes {
            self.apply_envelope(from, envelope, world);
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    pub fn tick(
        &mut self,
        world: &mut WorldModel,
        detections: &[FusedDetection],
        oracle: &dyn AimOracle,
        tick: Tick,
        dt_secs: f64,
    ) -> TickReport {
        for entity in world.drain_removals() {
            self.registry.close(entity);
        }
        self.registry.drain_pending_attachments(world);

        for frame in self.ingress.drain() {
            self.apply_frame(frame, world);
        }

        let effects = {
            let ctx = TickContext::new(tick, dt_secs, world, detections, oracle);
            self.registry.tick_all(&ctx)
        };

        let mut report = TickReport::default();
        for (source, effect) in effects {
            match effect {
                Effect::Aim { sensor, command } => {
                    let Some(pos) = world.resolve(sensor).map(|o| o.position) else {
                        log::debug!("aim command for vanished sensor {}", sensor);
                        continue;
                    };
                    if let Some(mount) = world.mount_mut(sensor) {
                        slew::apply_command(mount, command, pos, dt_secs);
                    }
                }
                Effect::LockChanged(event) => {
                    self.broadcast_lock(source, event, world);
                    report.lock_events.push(event);
                }
            }
        }
        report
    }

    /// Encode and send every non-empty remote batch.  Call once per tick,
    /// after `tick`.
    pub fn flush(&mut self, transport: &mut dyn FrameTransport) {
        for (&peer, state) in self.remotes.iter_mut() {
            if state.queue.is_empty() {
                continue;
            }
            let batch = state.queue.take_batch();
            log::trace!("flush to {}: {}", peer, describe_batch(&batch));
            match encode_frame(&batch) {
                Ok(frame) => transport.send(peer, frame),
                Err(err) => log::error!("frame encode for {} failed, batch dropped: {}", peer, err),
            }
        }
    }

    /// Envelopes addressed to the host player since the last drain.
    pub fn drain_local(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.local_outbox)
    }

    // ── Message application ───────────────────────────────────────────────────

    fn apply_frame(&mut self, frame: RawFrame, world: &WorldModel) {
        match decode_frame(&frame.bytes) {
            Ok(envelopes) => {
                for envelope in envelopes {
                    self.apply_envelope(frame.from, envelope, world);
                }
            }
            Err(err) => {
                log::error!("dropping undecodable frame from {}: {}", frame.from, err);
            }
        }
    }

    fn apply_envelope(&mut self, from: PeerId, envelope: Envelope, world: &WorldModel) {
        let Envelope { entity, body } = envelope;
        match body {
            MessageBody::AttachRequest { kind } => {
                // No server state for the id means silence on the wire; the
                // peer may re-request later.
                match self.registry.lookup(entity, kind).map(|l| l.attach_payload()) {
                    Some(payload) => {
                        let reply = Envelope::new(entity, MessageBody::AttachResponse(payload));
                        self.send_to_one(from, reply);
                    }
                    None => log::debug!("no state for attach request {} {} from {}", entity, kind, from),
                }
            }
            MessageBody::StateUpdate(payload) => {
                let kind = payload.kind();
                match self.registry.apply_or_buffer(entity, payload) {
                    UpdateOutcome::Applied => {
                        // Rebroadcast the merged server value, never the
                        // peer's claim.
                        let merged = self
                            .registry
                            .lookup(entity, kind)
                            .and_then(|l| l.update_payload());
                        if let Some(merged) = merged {
                            let envelope = Envelope::new(entity, MessageBody::StateUpdate(merged));
                            let (origin, range) = self.sync_origin(entity, world);
                            self.fan_out_within(envelope, origin, range, from);
                        }
                    }
                    UpdateOutcome::Buffered => {
                        log::debug!("{} update for {} buffered until its logic attaches", kind, entity);
                    }
                    UpdateOutcome::Refused => {}
                }
            }
            MessageBody::AttachResponse(_) => {
                log::debug!("ignoring attach response sent to the server by {}", from);
            }
        }
    }

    fn broadcast_lock(&mut self, tracker: EntityId, event: LockEvent, world: &WorldModel) {
        let entry = LockEntry { sensor: event.sensor, target: event.current };
        let envelope = Envelope::new(tracker, MessageBody::StateUpdate(UpdatePayload::TrackerLock(entry)));
        let (origin, range) = self.sync_origin(tracker, world);
        self.fan_out_within(envelope, origin, range, PeerId::INVALID);
    }

    /// Fan-out parameters for state about `entity`.  Without a resolvable
    /// position every peer is treated as interested.
    fn sync_origin(&self, entity: EntityId, world: &WorldModel) -> (Vec3, f64) {
        match world.resolve(entity) {
            Some(object) => (object.position, self.config.sync_range_m),
            None => (Vec3::ZERO, f64::INFINITY),
        }
    }
}
