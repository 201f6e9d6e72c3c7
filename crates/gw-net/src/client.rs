//! The mirroring endpoint.
//!
//! A client holds no authority: its registry is populated from attach
//! responses, its logics are mirrors that never emit lock events, and its
//! single outbound queue points at the server.  In singleplayer the host's
//! client skips the wire entirely and trades envelopes with the in-process
//! server through the loopback calls.

use gw_core::{EntityId, PeerId, Tick};
use gw_logic::{BlockLogic, Effect, TickContext};
use gw_registry::{LogicRegistry, Registered};
use gw_wire::{decode_frame, describe_batch, encode_frame};
use gw_wire::{Envelope, LogicKind, MessageBody};
use gw_world::{AimOracle, WorldModel, slew};

use crate::ingress::{Ingress, IngressSender, RawFrame};
use crate::queue::OutboundQueue;
use crate::server::ServerEndpoint;
use crate::transport::FrameTransport;

/// One client's view of the session.
pub struct ClientEndpoint {
    registry: LogicRegistry,
    queue:    OutboundQueue,
    ingress:  Ingress,
}

impl ClientEndpoint {
    pub fn new() -> Self {
        Self {
            registry: LogicRegistry::new(),
            queue: OutboundQueue::default(),
            ingress: Ingress::new(),
        }
    }

    pub fn registry(&self) -> &LogicRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut LogicRegistry {
        &mut self.registry
    }

    // ── Outbound ──────────────────────────────────────────────────────────────

    /// Ask the server for the current state of `entity`'s logic of `kind`.
    /// The server answers with an attach response or, if it holds nothing
    /// for that identity, with silence; re-requesting is the caller's call.
    pub fn request_attach(&mut self, entity: EntityId, kind: LogicKind) {
        self.queue.push(Envelope::new(entity, MessageBody::AttachRequest { kind }));
    }

    /// Queue an arbitrary envelope for the server.
    pub fn enqueue(&mut self, envelope: Envelope) {
        self.queue.push(envelope);
    }

    pub fn outbound_len(&self) -> usize {
        self.queue.len()
    }

    // ── Ingress ───────────────────────────────────────────────────────────────

    /// Handle for delivery threads; drained at the top of [`tick`][Self::tick].
    pub fn ingress(&self) -> IngressSender {
        self.ingress.sender()
    }

    /// Apply envelopes handed over in-process (the host player's loopback).
    pub fn receive_local(&mut self, envelopes: Vec<Envelope>, world: &WorldModel) {
        for envelope in envelopes {
            self.apply_envelope(envelope, world);
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    pub fn tick(&mut self, world: &mut WorldModel, oracle: &dyn AimOracle, tick: Tick, dt_secs: f64) {
        for entity in world.drain_removals() {
            self.registry.close(entity);
        }
        self.registry.drain_pending_attachments(world);

        for frame in self.ingress.drain() {
            self.apply_frame(frame, world);
        }

        let effects = {
            // Clients carry no sensing feed; mirrors tick against an empty
            // contact picture.
            let ctx = TickContext::new(tick, dt_secs, world, &[], oracle);
            self.registry.tick_all(&ctx)
        };
        for (_, effect) in effects {
            if let Effect::Aim { sensor, command } = effect {
                let Some(pos) = world.resolve(sensor).map(|o| o.position) else {
                    continue;
                };
                if let Some(mount) = world.mount_mut(sensor) {
                    slew::apply_command(mount, command, pos, dt_secs);
                }
            }
        }
    }

    /// Encode and send the queued batch to the server.  Call once per tick,
    /// after `tick`.
    pub fn flush_to(&mut self, transport: &mut dyn FrameTransport) {
        if self.queue.is_empty() {
            return;
        }
        let batch = self.queue.take_batch();
        log::trace!("flush to server: {}", describe_batch(&batch));
        match encode_frame(&batch) {
            Ok(frame) => transport.send(PeerId::SERVER, frame),
            Err(err) => log::error!("frame encode failed, batch dropped: {}", err),
        }
    }

    /// Singleplayer fast path: hand the batch straight to the in-process
    /// server as `from`, skipping the codec and the wire.
    pub fn flush_loopback(&mut self, from: PeerId, server: &mut ServerEndpoint, world: &WorldModel) {
        let batch = self.queue.take_batch();
        if !batch.is_empty() {
            server.receive_local(from, batch, world);
        }
    }

    // ── Message application ───────────────────────────────────────────────────

    fn apply_frame(&mut self, frame: RawFrame, world: &WorldModel) {
        match decode_frame(&frame.bytes) {
            Ok(envelopes) => {
                for envelope in envelopes {
                    self.apply_envelope(envelope, world);
                }
            }
            Err(err) => {
                log::error!("dropping undecodable frame from {}: {}", frame.from, err);
            }
        }
    }

    fn apply_envelope(&mut self, envelope: Envelope, world: &WorldModel) {
        let Envelope { entity, body } = envelope;
        match body {
            MessageBody::AttachResponse(payload) => {
                let logic = BlockLogic::from_attach(&payload);
                if self.registry.register(world, entity, logic) == Registered::Deferred {
                    log::debug!("mirror for {} deferred until its object spawns", entity);
                }
            }
            MessageBody::StateUpdate(payload) => {
                // Buffered and refused outcomes both end here; the registry
                // already logged anything interesting.
                let _ = self.registry.apply_or_buffer(entity, payload);
            }
            MessageBody::AttachRequest { kind } => {
                log::debug!("ignoring {} attach request addressed to a client", kind);
            }
        }
    }
}

impl Default for ClientEndpoint {
    fn default() -> Self {
        Self::new()
    }
}
