//! skirmish — small end-to-end session for the gridwatch runtime.
//!
//! One server, the host player's loopback client, and a remote operator on
//! a lossy link defend a coastal site against four scripted contacts for
//! thirty simulated seconds.  Lock transitions land in
//! `output/skirmish/locks.csv`; run with `RUST_LOG=debug` to watch the
//! wire traffic.

mod site;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use gw_core::{PeerId, Tick, Vec3};
use gw_logic::{BlockLogic, SearchDirector, SensorView, TrackerLogic};
use gw_sim::{
    LinkConfig, LockLogger, NetObserver, NetSimBuilder, SimConfig, load_tracks_reader,
};
use gw_tracker::{LockEvent, TrackerConfig};
use gw_wire::{
    Envelope, LogicKind, MessageBody, SearchSettings, SensorSettings, UpdatePayload,
};

use site::{DISH_EAST, DISH_WEST, FIRE_CONTROL, PERIMETER_RADAR, SEARCH_HEAD};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:               u64 = 42;
const TICKS_PER_SECOND:   u32 = 60;
const SIM_SECS:           u64 = 30;
const TOTAL_TICKS:        u64 = SIM_SECS * TICKS_PER_SECOND as u64;
const ATTACH_RETRY_TICKS: u64 = 30;

const HOST_PEER:   PeerId = PeerId(1);
const REMOTE_PEER: PeerId = PeerId(2);

/// Tick at which the host operator extends the perimeter radar's range.
const RANGE_ORDER_TICK: u64 = 300;
const EXTENDED_RANGE_M: f64 = 6_500.0;

// ── Raid script ───────────────────────────────────────────────────────────────

// Four contacts over 30 s: two attack headings (the western one breaks off
// at T+23 s, forcing a re-scan past the blast shield), one late pop-up due
// north, and one friendly squawking blue-7 that the tracker must ignore.
const SCENARIO_CSV: &str = "\
track_id,first_tick,last_tick,x,y,z,vx,vy,vz,kind,iff\n\
501,0,1800,4500,200,4500,-25,-1,-25,radar,\n\
502,240,1400,-4000,150,5000,20,0,-28,thermal,\n\
503,600,1500,0,80,6000,0,0,-35,optical,\n\
504,0,1800,2000,300,2000,-10,-2,-10,transponder,blue-7\n\
";

// ── Observer wrapper to count transitions ─────────────────────────────────────

struct CountingObserver {
    inner:       LockLogger,
    lock_events: usize,
}

impl CountingObserver {
    fn new(inner: LockLogger) -> Self {
        Self { inner, lock_events: 0 }
    }
}

impl NetObserver for CountingObserver {
    fn on_lock_event(&mut self, tick: Tick, event: &LockEvent) {
        self.lock_events += 1;
        self.inner.on_lock_event(tick, event);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== skirmish — gridwatch session demo ===");
    println!("Peers: host + 1 remote  |  Duration: {SIM_SECS} s  |  Seed: {SEED}");
    println!();

    // 1. Load the raid script.
    let scenario = load_tracks_reader(Cursor::new(SCENARIO_CSV))?;
    println!("Raid script: {} tracks, last detection at {}", scenario.len(), scenario.last_tick());

    // 2. Server-side blocks: fire control with two dishes, the perimeter
    //    radar, and a search head sweeping the northern approach.
    let tracker_config = TrackerConfig {
        friendly_codes: vec!["blue-7".to_string()],
        ..Default::default()
    };
    let fire_control = BlockLogic::Tracker(TrackerLogic::authority(
        tracker_config,
        vec![DISH_EAST, DISH_WEST],
    ));
    let radar = BlockLogic::SensorView(SensorView::new(SensorSettings {
        range_m: 4_000.0,
        ..Default::default()
    }));
    let search = BlockLogic::SearchDirector(SearchDirector::authority(
        SearchSettings::default(),
        vec![SEARCH_HEAD],
    ));

    // 3. Wire the session: host rides loopback, the remote crosses a link
    //    that drops one frame in twenty.
    let config = SimConfig {
        total_ticks:        TOTAL_TICKS,
        ticks_per_second:   TICKS_PER_SECOND,
        seed:               SEED,
        attach_retry_ticks: ATTACH_RETRY_TICKS,
    };
    let link = LinkConfig {
        drop_chance:      0.05,
        duplicate_chance: 0.02,
        min_delay_ticks:  1,
        max_delay_ticks:  4,
    };
    let wanted = vec![
        (FIRE_CONTROL, LogicKind::Tracker),
        (PERIMETER_RADAR, LogicKind::SensorView),
        (SEARCH_HEAD, LogicKind::SearchDirector),
    ];
    let mut sim = NetSimBuilder::new(config, site::build_occluders())
        .server_world(site::build_site())
        .server_logic(FIRE_CONTROL, fire_control)
        .server_logic(PERIMETER_RADAR, radar)
        .server_logic(SEARCH_HEAD, search)
        .link(link)
        .scenario(scenario)
        .host_client(HOST_PEER, Vec3::new(0.0, 5.0, 0.0), site::build_site(), wanted.clone())
        .client(REMOTE_PEER, Vec3::new(-120.0, 2.0, -40.0), site::build_site(), wanted.clone())
        .build()?;

    // 4. Lock transitions go to CSV.
    std::fs::create_dir_all("output/skirmish")?;
    let logger = LockLogger::create(Path::new("output/skirmish/locks.csv"))?;
    let mut obs = CountingObserver::new(logger);

    // 5. Run in two legs: step to T+5 s, have the host operator push a
    //    longer radar range (the server clamps, adopts, and rebroadcasts
    //    it), then run out the session.
    let t0 = Instant::now();
    sim.run_ticks(RANGE_ORDER_TICK, &mut obs);
    if let Some(host) = sim.clients.iter_mut().find(|c| c.peer == HOST_PEER) {
        host.endpoint.enqueue(Envelope::new(
            PERIMETER_RADAR,
            MessageBody::StateUpdate(UpdatePayload::Sensor(SensorSettings {
                range_m: EXTENDED_RANGE_M,
                ..Default::default()
            })),
        ));
    }
    sim.run(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("lock log error: {e}");
    }

    // 6. Summary.
    println!();
    println!("Session complete in {:.3} s", elapsed.as_secs_f64());
    println!("  lock transitions    : {} (output/skirmish/locks.csv)", obs.lock_events);
    println!("  link                : {}", sim.link.stats());
    println!();

    // Final lock table, straight from the authority tracker.
    println!("{:<16} {:<14}", "Dish", "Locked track");
    println!("{}", "-".repeat(30));
    if let Some(BlockLogic::Tracker(tracker)) =
        sim.server.registry().lookup(FIRE_CONTROL, LogicKind::Tracker)
    {
        for entry in tracker.lock_table() {
            let dish = sim
                .server_world
                .resolve(entry.sensor)
                .map(|o| o.name.clone())
                .unwrap_or_else(|| entry.sensor.to_string());
            let target = entry
                .target
                .map(|t| t.0.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{dish:<16} {target:<14}");
        }
    }
    println!();

    // What the remote operator ended up seeing.
    println!("{:<18} {:<10}", "Remote mirror", "Attached");
    println!("{}", "-".repeat(28));
    if let Some(remote) = sim.client(REMOTE_PEER) {
        for (entity, kind) in &wanted {
            let attached = remote.endpoint.registry().lookup(*entity, *kind).is_some();
            println!("{:<18} {:<10}", kind.as_str(), if attached { "yes" } else { "no" });
        }
        if let Some(BlockLogic::SensorView(view)) =
            remote.endpoint.registry().lookup(PERIMETER_RADAR, LogicKind::SensorView)
        {
            println!();
            println!("Remote sees radar range {:.0} m", view.settings.range_m);
        }
    }

    Ok(())
}
