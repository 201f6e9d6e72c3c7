//! Fluent builder for constructing a [`NetSim`].

use gw_core::{EntityId, PeerId, SimRng, Vec3};
use gw_logic::BlockLogic;
use gw_net::{ClientEndpoint, ServerConfig, ServerEndpoint};
use gw_wire::LogicKind;
use gw_world::{AimOracle, WorldModel};

use crate::link::{LinkConfig, LossyLink};
use crate::scenario::Scenario;
use crate::sim::{NetSim, SimClient, SimConfig};
use crate::{SimError, SimResult};

/// RNG stream offset for the link, derived from the session's root seed.
const LINK_RNG_OFFSET: u64 = 1;

/// Fluent builder for [`NetSim<A>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — tick count, seed, attach retry cadence
/// - `A: AimOracle` — the occlusion oracle trackers test line of sight with
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                        |
/// |------------------------|--------------------------------|
/// | `.server_config(c)`    | `ServerConfig::default()`      |
/// | `.server_world(w)`     | Empty `WorldModel`             |
/// | `.server_logic(e, l)`  | No server-side logic           |
/// | `.link(c)`             | Perfect next-tick delivery     |
/// | `.scenario(s)`         | No scripted tracks             |
/// | `.client(..)`          | No clients                     |
/// | `.host_client(..)`     | No loopback client             |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = NetSimBuilder::new(config, OpenField)
///     .server_world(world)
///     .server_logic(turret, BlockLogic::Tracker(tracker))
///     .client(PeerId(1), Vec3::ZERO, client_world, vec![(turret, LogicKind::Tracker)])
///     .link(LinkConfig { drop_chance: 0.2, ..LinkConfig::default() })
///     .build()?;
/// sim.run(&mut NoopNetObserver);
/// ```
pub struct NetSimBuilder<A: AimOracle> {
    config:        SimConfig,
    oracle:        A,
    server_config: Option<ServerConfig>,
    server_world:  Option<WorldModel>,
    server_logic:  Vec<(EntityId, BlockLogic)>,
    link:          Option<LinkConfig>,
    scenario:      Option<Scenario>,
    clients:       Vec<SimClient>,
}

impl<A: AimOracle> NetSimBuilder<A> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, oracle: A) -> Self {
        Self {
            config,
            oracle,
            server_config: None,
            server_world:  None,
            server_logic:  Vec::new(),
            link:          None,
            scenario:      None,
            clients:       Vec::new(),
        }
    }

    /// Supply the server endpoint configuration (sync range).
    pub fn server_config(mut self, config: ServerConfig) -> Self {
        self.server_config = Some(config);
        self
    }

    /// Supply the authoritative world.
    ///
    /// Logic registered via [`server_logic`][Self::server_logic] attaches to
    /// objects in this world; entities absent at build time stay pending
    /// until the world spawns them.
    pub fn server_world(mut self, world: WorldModel) -> Self {
        self.server_world = Some(world);
        self
    }

    /// Register one authority logic on the server at build time.
    ///
    /// May be called repeatedly, including several times for one entity.
    pub fn server_logic(mut self, entity: EntityId, logic: BlockLogic) -> Self {
        self.server_logic.push((entity, logic));
        self
    }

    /// Supply loss and latency parameters for the link.
    ///
    /// If not called, the link delivers every frame on the next tick.
    pub fn link(mut self, config: LinkConfig) -> Self {
        self.link = Some(config);
        self
    }

    /// Supply the scripted contact picture.
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Add a wire client: its traffic crosses the lossy link.
    ///
    /// `wanted` lists the mirrors the client requests (and re-requests) until
    /// they attach.
    pub fn client(
        self,
        peer: PeerId,
        position: Vec3,
        world: WorldModel,
        wanted: Vec<(EntityId, LogicKind)>,
    ) -> Self {
        self.push_client(peer, position, world, wanted, false)
    }

    /// Add the host player's client: its traffic bypasses the link entirely.
    ///
    /// At most one host client may be added.
    pub fn host_client(
        self,
        peer: PeerId,
        position: Vec3,
        world: WorldModel,
        wanted: Vec<(EntityId, LogicKind)>,
    ) -> Self {
        self.push_client(peer, position, world, wanted, true)
    }

    fn push_client(
        mut self,
        peer: PeerId,
        position: Vec3,
        world: WorldModel,
        wanted: Vec<(EntityId, LogicKind)>,
        loopback: bool,
    ) -> Self {
        self.clients.push(SimClient {
            peer,
            endpoint: ClientEndpoint::new(),
            world,
            position,
            wanted,
            loopback,
        });
        self
    }

    /// Validate inputs, wire peers into the server, and return a
    /// ready-to-run [`NetSim`].
    pub fn build(self) -> SimResult<NetSim<A>> {
        // ── Validate ──────────────────────────────────────────────────────
        let link_config = self.link.unwrap_or_default();
        link_config
            .validate()
            .map_err(SimError::Config)?;

        for (i, client) in self.clients.iter().enumerate() {
            if client.peer == PeerId::SERVER {
                return Err(SimError::Config(format!(
                    "{} is reserved for the server",
                    client.peer
                )));
            }
            if self.clients[..i].iter().any(|c| c.peer == client.peer) {
                return Err(SimError::Config(format!("duplicate client {}", client.peer)));
            }
        }
        if self.clients.iter().filter(|c| c.loopback).count() > 1 {
            return Err(SimError::Config("more than one host client".to_string()));
        }

        // ── Derive RNG streams from the root seed ─────────────────────────
        let mut root = SimRng::new(self.config.seed);
        let link = LossyLink::new(link_config, root.child(LINK_RNG_OFFSET));

        // ── Wire peers into the server ────────────────────────────────────
        let mut server = ServerEndpoint::new(self.server_config.unwrap_or_default());
        for client in &self.clients {
            if client.loopback {
                server.set_host(client.peer);
            } else {
                server.connect(client.peer);
            }
            server.update_peer_position(client.peer, client.position);
        }

        // ── Register server-side logic ────────────────────────────────────
        let server_world = self.server_world.unwrap_or_default();
        for (entity, logic) in self.server_logic {
            server.registry_mut().register(&server_world, entity, logic);
        }

        Ok(NetSim {
            clock:        self.config.make_clock(),
            config:       self.config,
            server,
            server_world,
            oracle:       self.oracle,
            clients:      self.clients,
            link,
            scenario:     self.scenario.unwrap_or_default(),
        })
    }
}
