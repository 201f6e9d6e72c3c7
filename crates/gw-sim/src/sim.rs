//! The `NetSim` struct and its tick loop.

use gw_core::{EntityId, PeerId, Tick, TickClock, Vec3};
use gw_net::{ClientEndpoint, IngressSender, ServerEndpoint};
use gw_wire::LogicKind;
use gw_world::{AimOracle, WorldModel};

use crate::link::{LinkTransport, LossyLink};
use crate::observer::NetObserver;
use crate::scenario::Scenario;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Session-level run parameters.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Total ticks to run.  At 60 ticks/second, 3600 is one simulated minute.
    pub total_ticks: u64,

    /// Update rate of the session loop.  Default: 60.
    pub ticks_per_second: u32,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Cadence, in ticks, at which a client re-sends attach requests for
    /// mirrors it still lacks.  Requests and responses can both be lost;
    /// retrying makes attachment converge on any link that delivers
    /// eventually.
    pub attach_retry_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_ticks:        600,
            ticks_per_second:   60,
            seed:               0,
            attach_retry_ticks: 30,
        }
    }
}

impl SimConfig {
    /// The tick at which the session ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `TickClock` pre-configured for this run.
    pub fn make_clock(&self) -> TickClock {
        TickClock::new(self.ticks_per_second)
    }
}

// ── Clients ───────────────────────────────────────────────────────────────────

/// One simulated player: a client endpoint plus its local world copy.
pub struct SimClient {
    /// Session identity presented to the server.
    pub peer: PeerId,

    /// The client half of the protocol.
    pub endpoint: ClientEndpoint,

    /// The client's own world copy.  Object spawns arrive through the engine
    /// layer (pre-populated by the scenario), block state only through the
    /// protocol.
    pub world: WorldModel,

    /// Avatar position the server uses for range fan-out.
    pub position: Vec3,

    /// Mirrors this client keeps requesting until they attach.
    pub wanted: Vec<(EntityId, LogicKind)>,

    /// `true` for the host-side client: its traffic bypasses the link.
    pub loopback: bool,
}

impl SimClient {
    /// Queue attach requests for any wanted mirror that has not attached yet.
    fn request_missing(&mut self, now: Tick, retry_ticks: u64) {
        if !now.0.is_multiple_of(retry_ticks.max(1)) {
            return;
        }
        for &(entity, kind) in &self.wanted {
            if self.endpoint.registry().lookup(entity, kind).is_none() {
                self.endpoint.request_attach(entity, kind);
            }
        }
    }
}

// ── NetSim ────────────────────────────────────────────────────────────────────

/// The session harness: one authoritative server, any number of simulated
/// clients, and a lossy link in between.
///
/// Each tick runs six phases:
///
/// 1. **Link delivery**: frames due this tick land in the receiving
///    endpoint's ingress queue.
/// 2. **Contact picture**: scripted tracks are sampled at the current tick.
/// 3. **Server tick**: queued frames apply, authority logic runs, lock
///    transitions are reported to the observer.
/// 4. **Server flush**: per-peer batches become frames on the link.
/// 5. **Client ticks**: each client re-requests missing mirrors, ticks its
///    endpoint, and flushes — wire clients into the link, the loopback
///    client straight into the server.
/// 6. **Host delivery**: envelopes the server addressed to the host peer are
///    handed to the loopback client, completing singleplayer round trips
///    within the tick.
///
/// Create via [`NetSimBuilder`][crate::NetSimBuilder].
pub struct NetSim<A: AimOracle> {
    /// Session run parameters (tick count, seed, retry cadence).
    pub config: SimConfig,

    /// Session clock — tracks the current tick and maps to real seconds.
    pub clock: TickClock,

    /// The authoritative endpoint.
    pub server: ServerEndpoint,

    /// The server's world.  Scripted detections are interpreted against it.
    pub server_world: WorldModel,

    /// Occlusion oracle shared by every tracker tick.
    pub oracle: A,

    /// Simulated players, at most one with `loopback` set.
    pub clients: Vec<SimClient>,

    /// The lossy carrier between the server and non-loopback clients.
    pub link: LossyLink,

    /// Scripted contact picture.
    pub scenario: Scenario,
}

impl<A: AimOracle> NetSim<A> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the session from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopNetObserver`][crate::NoopNetObserver] if you don't need
    /// callbacks.
    pub fn run<O: NetObserver>(&mut self, observer: &mut O) {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            observer.on_tick_start(now);
            self.process_tick(now, observer);
            observer.on_tick_end(now, &self.link.stats());
            self.clock.advance();
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: NetObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            self.process_tick(now, observer);
            observer.on_tick_end(now, &self.link.stats());
            self.clock.advance();
        }
    }

    /// The client registered for `peer`, if any.
    pub fn client(&self, peer: PeerId) -> Option<&SimClient> {
        self.clients.iter().find(|c| c.peer == peer)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: NetObserver>(&mut self, now: Tick, observer: &mut O) {
        let dt_secs = self.clock.secs_per_tick();

        // ── Phase 1: deliver link traffic due this tick ───────────────────
        //
        // Frames land in the receiving endpoint's ingress queue and are
        // interpreted inside that endpoint's own tick below.
        let server_rx = self.server.ingress();
        let client_rx: Vec<(PeerId, IngressSender)> = self
            .clients
            .iter()
            .map(|c| (c.peer, c.endpoint.ingress()))
            .collect();
        self.link.deliver_due(now, |from, to, bytes| {
            if to == PeerId::SERVER {
                server_rx.deliver(from, bytes);
            } else if let Some((_, rx)) = client_rx.iter().find(|(peer, _)| *peer == to) {
                rx.deliver(from, bytes);
            } else {
                log::debug!("frame for unknown peer {to} dropped");
            }
        });

        // ── Phase 2: sample the contact picture ───────────────────────────
        let detections = self.scenario.detections_at(now, dt_secs);

        // ── Phase 3: server tick ──────────────────────────────────────────
        let report = self.server.tick(
            &mut self.server_world,
            &detections,
            &self.oracle,
            now,
            dt_secs,
        );
        for event in &report.lock_events {
            observer.on_lock_event(now, event);
        }

        // ── Phase 4: server flush ─────────────────────────────────────────
        self.server
            .flush(&mut LinkTransport::new(&mut self.link, PeerId::SERVER, now));

        // ── Phase 5: client ticks ─────────────────────────────────────────
        for client in &mut self.clients {
            client.request_missing(now, self.config.attach_retry_ticks);
            client
                .endpoint
                .tick(&mut client.world, &self.oracle, now, dt_secs);
            if client.loopback {
                client
                    .endpoint
                    .flush_loopback(client.peer, &mut self.server, &self.server_world);
            } else {
                client
                    .endpoint
                    .flush_to(&mut LinkTransport::new(&mut self.link, client.peer, now));
            }
        }

        // ── Phase 6: host delivery ────────────────────────────────────────
        //
        // Everything the server addressed to the host peer this tick skipped
        // the wire.  Hand it to the loopback client now so singleplayer
        // round trips complete within the tick.
        if let Some(host) = self.clients.iter_mut().find(|c| c.loopback) {
            let envelopes = self.server.drain_local();
            if !envelopes.is_empty() {
                host.endpoint.receive_local(envelopes, &host.world);
            }
        }
    }
}
