//! Harness tests — the lossy link, scenario loading, and full sessions
//! running server and clients over simulated frames.

use std::io::Cursor;

use gw_core::{DetectionKind, EntityId, PeerId, SimRng, Tick, Vec3};
use gw_logic::{BlockLogic, SensorView, TrackerLogic};
use gw_tracker::LockEvent;
use gw_wire::{Envelope, LogicKind, MessageBody, SensorSettings, UpdatePayload};
use gw_world::{AimOracle, MountDef, ObjectHandle, OpenField, WorldModel};

use crate::builder::NetSimBuilder;
use crate::link::{LinkConfig, LinkStats, LossyLink};
use crate::lock_log::LockLogger;
use crate::observer::{NetObserver, NoopNetObserver};
use crate::scenario::{Scenario, ScriptedTrack, load_tracks_reader};
use crate::sim::{NetSim, SimConfig};
use crate::SimError;

// ── Helpers ───────────────────────────────────────────────────────────────────

const P1: PeerId = PeerId(1);
const P2: PeerId = PeerId(2);
const HOST: PeerId = PeerId(7);
const E1: EntityId = EntityId(41);
const E9: EntityId = EntityId(99);
const TRACKER: EntityId = EntityId(60);
const DISH: EntityId = EntityId(70);
const TRACK_A: EntityId = EntityId(900);
const TRACK_B: EntityId = EntityId(901);

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        total_ticks,
        ticks_per_second:   60,
        seed:               42,
        attach_retry_ticks: 5,
    }
}

fn world_with(entities: &[EntityId]) -> WorldModel {
    let mut world = WorldModel::default();
    for &entity in entities {
        world.spawn(ObjectHandle::fixed(entity, "block", Vec3::ZERO, 5.0));
    }
    world
}

fn sensor_view(range_m: f64) -> BlockLogic {
    BlockLogic::SensorView(SensorView::new(SensorSettings {
        range_m,
        ..Default::default()
    }))
}

fn sensor_update(range_m: f64) -> Envelope {
    Envelope::new(
        E1,
        MessageBody::StateUpdate(UpdatePayload::Sensor(SensorSettings {
            range_m,
            ..Default::default()
        })),
    )
}

/// Session with one sensor block on the server and one wire client per peer,
/// each wanting the sensor mirror.
fn sensor_sim(total_ticks: u64, link: LinkConfig, peers: &[PeerId]) -> NetSim<OpenField> {
    let mut builder = NetSimBuilder::new(test_config(total_ticks), OpenField)
        .server_world(world_with(&[E1]))
        .server_logic(E1, sensor_view(3_000.0))
        .link(link);
    for &peer in peers {
        builder = builder.client(
            peer,
            Vec3::ZERO,
            world_with(&[E1]),
            vec![(E1, LogicKind::SensorView)],
        );
    }
    builder.build().expect("valid session")
}

/// Two stationary tracks in the turret's envelope: A expires at tick 60, B
/// stays through tick 200.  File order makes A the priority contact.
fn two_track_scenario() -> Scenario {
    Scenario::new(vec![
        ScriptedTrack {
            entity:     TRACK_A,
            first_tick: Tick::ZERO,
            last_tick:  Tick(60),
            origin:     Vec3::new(1_000.0, 0.0, 1_000.0),
            velocity:   Vec3::ZERO,
            kind:       DetectionKind::Radar,
            iff_codes:  vec![],
        },
        ScriptedTrack {
            entity:     TRACK_B,
            first_tick: Tick::ZERO,
            last_tick:  Tick(200),
            origin:     Vec3::new(0.0, 0.0, 2_000.0),
            velocity:   Vec3::ZERO,
            kind:       DetectionKind::Radar,
            iff_codes:  vec![],
        },
    ])
}

/// Session with an authority tracker controlling one turret dish, fed by
/// [`two_track_scenario`].
fn tracker_sim(total_ticks: u64, link: LinkConfig, with_client: bool) -> NetSim<OpenField> {
    let mut world = WorldModel::default();
    world.spawn(ObjectHandle::fixed(TRACKER, "fire control", Vec3::ZERO, 5.0));
    world.spawn(ObjectHandle::fixed(DISH, "dish", Vec3::ZERO, 5.0));
    world.add_mount(DISH, MountDef::turret()).expect("valid mount");

    let mut builder = NetSimBuilder::new(test_config(total_ticks), OpenField)
        .server_world(world)
        .server_logic(
            TRACKER,
            BlockLogic::Tracker(TrackerLogic::authority(Default::default(), vec![DISH])),
        )
        .link(link)
        .scenario(two_track_scenario());
    if with_client {
        builder = builder.client(
            P1,
            Vec3::ZERO,
            world_with(&[TRACKER, DISH]),
            vec![(TRACKER, LogicKind::Tracker)],
        );
    }
    builder.build().expect("valid session")
}

fn mirror_range<A: AimOracle>(sim: &NetSim<A>, peer: PeerId, entity: EntityId) -> Option<f64> {
    match sim.client(peer)?.endpoint.registry().lookup(entity, LogicKind::SensorView)? {
        BlockLogic::SensorView(view) => Some(view.settings.range_m),
        _ => None,
    }
}

/// Observer that records every lock transition with its tick.
struct RecordLocks(Vec<(Tick, LockEvent)>);

impl NetObserver for RecordLocks {
    fn on_lock_event(&mut self, tick: Tick, event: &LockEvent) {
        self.0.push((tick, *event));
    }
}

// ── LossyLink ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod links {
    use super::*;

    fn collect(link: &mut LossyLink, tick: Tick) -> Vec<(PeerId, PeerId, Vec<u8>)> {
        let mut out = Vec::new();
        link.deliver_due(tick, |from, to, bytes| out.push((from, to, bytes)));
        out
    }

    #[test]
    fn perfect_link_delivers_on_the_next_tick() {
        let mut link = LossyLink::new(LinkConfig::default(), SimRng::new(7));
        link.submit(P1, PeerId::SERVER, vec![1, 2, 3], Tick::ZERO);

        assert!(collect(&mut link, Tick::ZERO).is_empty(), "never same-tick");
        assert_eq!(
            collect(&mut link, Tick(1)),
            vec![(P1, PeerId::SERVER, vec![1, 2, 3])]
        );
        assert_eq!(link.stats().sent, 1);
        assert_eq!(link.stats().delivered, 1);
        assert_eq!(link.in_flight_len(), 0);
    }

    #[test]
    fn dropped_frames_never_arrive() {
        let config = LinkConfig { drop_chance: 1.0, ..Default::default() };
        let mut link = LossyLink::new(config, SimRng::new(7));
        link.submit(P1, PeerId::SERVER, vec![9], Tick::ZERO);

        for t in 0..=10 {
            assert!(collect(&mut link, Tick(t)).is_empty());
        }
        assert_eq!(link.stats().dropped, 1);
        assert_eq!(link.stats().delivered, 0);
        assert_eq!(link.in_flight_len(), 0);
    }

    #[test]
    fn duplicated_frames_arrive_twice() {
        let config = LinkConfig { duplicate_chance: 1.0, ..Default::default() };
        let mut link = LossyLink::new(config, SimRng::new(7));
        link.submit(P1, PeerId::SERVER, vec![5], Tick::ZERO);

        // Both copies carry delay 1 here (delay window is 1..=1).
        let due = collect(&mut link, Tick(1));
        assert_eq!(due.len(), 2);
        assert!(due.iter().all(|(f, t, b)| *f == P1 && *t == PeerId::SERVER && b == &[5]));
        assert_eq!(link.stats().sent, 1);
        assert_eq!(link.stats().duplicated, 1);
        assert_eq!(link.stats().delivered, 2);
    }

    #[test]
    fn delays_stay_inside_the_configured_window() {
        let config = LinkConfig {
            drop_chance:      0.0,
            duplicate_chance: 0.0,
            min_delay_ticks:  2,
            max_delay_ticks:  4,
        };
        let mut link = LossyLink::new(config, SimRng::new(7));
        link.submit(P1, PeerId::SERVER, vec![1], Tick::ZERO);

        assert!(collect(&mut link, Tick(1)).is_empty(), "below min delay");
        let delivered: usize = (2..=4).map(|t| collect(&mut link, Tick(t)).len()).sum();
        assert_eq!(delivered, 1);
        assert_eq!(link.in_flight_len(), 0);
    }

    #[test]
    fn same_seed_reproduces_the_schedule() {
        fn schedule(seed: u64) -> Vec<(u64, Vec<u8>)> {
            let config = LinkConfig {
                drop_chance:      0.3,
                duplicate_chance: 0.3,
                min_delay_ticks:  1,
                max_delay_ticks:  5,
            };
            let mut link = LossyLink::new(config, SimRng::new(seed));
            for i in 0..20u8 {
                link.submit(P1, PeerId::SERVER, vec![i], Tick(u64::from(i)));
            }
            let mut out = Vec::new();
            for t in 0..=30 {
                link.deliver_due(Tick(t), |_, _, bytes| out.push((t, bytes)));
            }
            assert_eq!(link.in_flight_len(), 0);
            out
        }

        assert_eq!(schedule(9), schedule(9));
    }
}

// ── Scenario loading ──────────────────────────────────────────────────────────

#[cfg(test)]
mod loading {
    use super::*;

    const CSV: &str = "\
track_id,first_tick,last_tick,x,y,z,vx,vy,vz,kind,iff
900,0,600,4000,0,3000,-5,0,0,radar,
901,120,600,-2500,40,2600,0,0,-8,thermal,hostile;fast
";

    #[test]
    fn loads_tracks_with_motion_and_iff() {
        let scenario = load_tracks_reader(Cursor::new(CSV)).expect("valid csv");
        assert_eq!(scenario.len(), 2);

        let a = &scenario.tracks[0];
        assert_eq!(a.entity, TRACK_A);
        assert_eq!(a.first_tick, Tick::ZERO);
        assert_eq!(a.last_tick, Tick(600));
        assert_eq!(a.origin, Vec3::new(4_000.0, 0.0, 3_000.0));
        assert_eq!(a.velocity, Vec3::new(-5.0, 0.0, 0.0));
        assert_eq!(a.kind, DetectionKind::Radar);
        assert!(a.iff_codes.is_empty());

        let b = &scenario.tracks[1];
        assert_eq!(b.kind, DetectionKind::Thermal);
        assert_eq!(b.iff_codes, vec!["hostile".to_string(), "fast".to_string()]);
        assert_eq!(scenario.last_tick(), Tick(600));
    }

    #[test]
    fn rejects_unknown_kind() {
        let csv = "track_id,first_tick,last_tick,x,y,z,vx,vy,vz,kind,iff\n1,0,10,0,0,0,0,0,0,sonar,\n";
        assert!(matches!(
            load_tracks_reader(Cursor::new(csv)),
            Err(SimError::Parse(_))
        ));
    }

    #[test]
    fn rejects_reversed_window() {
        let csv = "track_id,first_tick,last_tick,x,y,z,vx,vy,vz,kind,iff\n1,50,10,0,0,0,0,0,0,radar,\n";
        assert!(matches!(
            load_tracks_reader(Cursor::new(csv)),
            Err(SimError::Parse(_))
        ));
    }

    #[test]
    fn detections_move_along_the_velocity_vector() {
        let track = ScriptedTrack {
            entity:     TRACK_A,
            first_tick: Tick::ZERO,
            last_tick:  Tick(600),
            origin:     Vec3::ZERO,
            velocity:   Vec3::new(12.0, 0.0, 0.0),
            kind:       DetectionKind::Radar,
            iff_codes:  vec![],
        };
        let secs_per_tick = 1.0 / 60.0;

        let at_start = track.detection_at(Tick::ZERO, secs_per_tick).expect("in window");
        assert_eq!(at_start.position, Vec3::ZERO);

        // One simulated second in: 12 m downrange.
        let later = track.detection_at(Tick(60), secs_per_tick).expect("in window");
        assert!((later.position.x - 12.0).abs() < 1e-9);
        assert_eq!(later.velocity, Some(Vec3::new(12.0, 0.0, 0.0)));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let scenario = Scenario::new(vec![ScriptedTrack {
            entity:     TRACK_A,
            first_tick: Tick(10),
            last_tick:  Tick(20),
            origin:     Vec3::ZERO,
            velocity:   Vec3::ZERO,
            kind:       DetectionKind::Radar,
            iff_codes:  vec![],
        }]);
        let dt = 1.0 / 60.0;
        assert!(scenario.detections_at(Tick(9), dt).is_empty());
        assert_eq!(scenario.detections_at(Tick(10), dt).len(), 1);
        assert_eq!(scenario.detections_at(Tick(20), dt).len(), 1);
        assert!(scenario.detections_at(Tick(21), dt).is_empty());
    }

    #[test]
    fn feed_keeps_file_order() {
        let scenario = load_tracks_reader(Cursor::new(CSV)).expect("valid csv");
        let feed = scenario.detections_at(Tick(120), 1.0 / 60.0);
        let order: Vec<EntityId> = feed.iter().map(|d| d.entity).collect();
        assert_eq!(order, vec![TRACK_A, TRACK_B]);
    }
}

// ── Lock log ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lock_logging {
    use super::*;

    #[test]
    fn logger_writes_one_row_per_event() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("locks.csv");

        let mut logger = LockLogger::create(&path).expect("create logger");
        logger.on_lock_event(
            Tick(14),
            &LockEvent { sensor: DISH, previous: None, current: Some(TRACK_A) },
        );
        logger.on_lock_event(
            Tick(96),
            &LockEvent { sensor: DISH, previous: Some(TRACK_A), current: None },
        );
        logger.on_sim_end(Tick(100));
        assert!(logger.take_error().is_none());

        let contents = std::fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["tick,sensor,previous,current", "14,70,,900", "96,70,900,"]);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut logger = LockLogger::create(&dir.path().join("locks.csv")).expect("create logger");
        logger.finish().expect("first finish");
        logger.finish().expect("second finish");
        assert!(logger.take_error().is_none());
    }
}

// ── NetSimBuilder validation ──────────────────────────────────────────────────

#[cfg(test)]
mod building {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim = NetSimBuilder::new(test_config(10), OpenField).build().expect("defaults");
        assert!(sim.clients.is_empty());
        assert_eq!(sim.clock.current_tick, Tick::ZERO);
        assert_eq!(sim.link.stats(), LinkStats::default());
    }

    #[test]
    fn rejects_zero_min_delay() {
        let result = NetSimBuilder::new(test_config(10), OpenField)
            .link(LinkConfig { min_delay_ticks: 0, ..Default::default() })
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn rejects_duplicate_peers() {
        let result = NetSimBuilder::new(test_config(10), OpenField)
            .client(P1, Vec3::ZERO, WorldModel::default(), vec![])
            .client(P1, Vec3::ZERO, WorldModel::default(), vec![])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_the_reserved_server_id() {
        let result = NetSimBuilder::new(test_config(10), OpenField)
            .client(PeerId::SERVER, Vec3::ZERO, WorldModel::default(), vec![])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_a_second_host() {
        let result = NetSimBuilder::new(test_config(10), OpenField)
            .host_client(HOST, Vec3::ZERO, WorldModel::default(), vec![])
            .host_client(P1, Vec3::ZERO, WorldModel::default(), vec![])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn unresolved_server_logic_stays_pending() {
        let sim = NetSimBuilder::new(test_config(10), OpenField)
            .server_logic(E9, sensor_view(1_000.0))
            .build()
            .expect("pending logic is not an error");
        assert_eq!(sim.server.registry().attached_len(), 0);
        assert_eq!(sim.server.registry().pending_attach_len(), 1);
    }
}

// ── Full sessions ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod sessions {
    use super::*;

    #[test]
    fn run_stops_at_the_configured_end() {
        let mut sim = sensor_sim(10, LinkConfig::default(), &[]);
        sim.run(&mut NoopNetObserver);
        assert_eq!(sim.clock.current_tick, Tick(10));
    }

    #[test]
    fn run_ticks_steps_incrementally() {
        let mut sim = sensor_sim(100, LinkConfig::default(), &[]);
        sim.run_ticks(5, &mut NoopNetObserver);
        assert_eq!(sim.clock.current_tick, Tick(5));
        sim.run_ticks(3, &mut NoopNetObserver);
        assert_eq!(sim.clock.current_tick, Tick(8));
    }

    /// Observer that counts hook invocations.
    struct HookCounter {
        starts: usize,
        ends:   usize,
        finals: usize,
    }

    impl NetObserver for HookCounter {
        fn on_tick_start(&mut self, _t: Tick) {
            self.starts += 1;
        }
        fn on_tick_end(&mut self, _t: Tick, _s: &LinkStats) {
            self.ends += 1;
        }
        fn on_sim_end(&mut self, _t: Tick) {
            self.finals += 1;
        }
    }

    #[test]
    fn observer_hooks_fire_once_per_tick() {
        let mut sim = sensor_sim(7, LinkConfig::default(), &[]);
        let mut counter = HookCounter { starts: 0, ends: 0, finals: 0 };
        sim.run(&mut counter);
        assert_eq!(counter.starts, 7);
        assert_eq!(counter.ends, 7);
        assert_eq!(counter.finals, 1);
    }

    #[test]
    fn attach_round_trip_over_the_wire() {
        let mut sim = sensor_sim(100, LinkConfig::default(), &[P1]);

        // Tick 0: request leaves the client.  Tick 1: server answers.
        // Tick 2: the response lands and the mirror attaches.
        sim.run_ticks(2, &mut NoopNetObserver);
        assert_eq!(mirror_range(&sim, P1, E1), None);
        sim.run_ticks(1, &mut NoopNetObserver);
        assert_eq!(mirror_range(&sim, P1, E1), Some(3_000.0));
    }

    #[test]
    fn update_propagates_to_other_clients_only() {
        let mut sim = sensor_sim(100, LinkConfig::default(), &[P1, P2]);
        sim.run_ticks(3, &mut NoopNetObserver);
        assert_eq!(mirror_range(&sim, P1, E1), Some(3_000.0));
        assert_eq!(mirror_range(&sim, P2, E1), Some(3_000.0));

        // First client claims a new range.
        sim.clients[0].endpoint.enqueue(sensor_update(4_000.0));
        sim.run_ticks(3, &mut NoopNetObserver);

        match sim.server.registry().lookup(E1, LogicKind::SensorView) {
            Some(BlockLogic::SensorView(view)) => assert_eq!(view.settings.range_m, 4_000.0),
            other => panic!("expected the authority view, got {other:?}"),
        }
        assert_eq!(mirror_range(&sim, P2, E1), Some(4_000.0), "other clients hear the change");
        assert_eq!(mirror_range(&sim, P1, E1), Some(3_000.0), "the originator gets no echo");
    }

    #[test]
    fn host_loopback_attaches_within_one_tick() {
        let mut sim = NetSimBuilder::new(test_config(10), OpenField)
            .server_world(world_with(&[E1]))
            .server_logic(E1, sensor_view(2_500.0))
            .host_client(HOST, Vec3::ZERO, world_with(&[E1]), vec![(E1, LogicKind::SensorView)])
            .build()
            .expect("valid session");

        sim.run_ticks(1, &mut NoopNetObserver);
        assert_eq!(mirror_range(&sim, HOST, E1), Some(2_500.0));
        assert_eq!(sim.link.stats().sent, 0, "loopback traffic never touches the link");
    }

    #[test]
    fn lock_history_follows_the_scenario() {
        let mut sim = tracker_sim(150, LinkConfig::default(), false);
        let mut history = RecordLocks(Vec::new());
        sim.run(&mut history);

        // Priority contact A is taken the moment it appears; when its track
        // expires at tick 60 the dish retargets B on the next sample.
        assert_eq!(
            history.0,
            vec![
                (
                    Tick::ZERO,
                    LockEvent { sensor: DISH, previous: None, current: Some(TRACK_A) },
                ),
                (
                    Tick(61),
                    LockEvent { sensor: DISH, previous: Some(TRACK_A), current: Some(TRACK_B) },
                ),
            ]
        );
    }

    #[test]
    fn lossy_attach_still_converges() {
        let link = LinkConfig {
            drop_chance:      0.3,
            duplicate_chance: 0.2,
            min_delay_ticks:  1,
            max_delay_ticks:  3,
        };
        let mut sim = sensor_sim(200, link, &[P1]);
        sim.run(&mut NoopNetObserver);

        assert_eq!(mirror_range(&sim, P1, E1), Some(3_000.0));
        assert!(sim.link.stats().dropped > 0, "the link was actually lossy");
    }

    #[test]
    fn same_seed_runs_are_identical() {
        fn run_once() -> (Vec<(Tick, LockEvent)>, LinkStats) {
            let link = LinkConfig {
                drop_chance:      0.25,
                duplicate_chance: 0.25,
                min_delay_ticks:  1,
                max_delay_ticks:  3,
            };
            let mut sim = tracker_sim(150, link, true);
            let mut history = RecordLocks(Vec::new());
            sim.run(&mut history);
            (history.0, sim.link.stats())
        }

        let (history_a, stats_a) = run_once();
        let (history_b, stats_b) = run_once();
        assert!(!history_a.is_empty());
        assert!(stats_a.sent > 0);
        assert_eq!(history_a, history_b);
        assert_eq!(stats_a, stats_b);
    }
}
