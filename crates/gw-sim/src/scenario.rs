//! CSV scenario loader — scripted contact tracks for a session.
//!
//! # CSV format
//!
//! One row per scripted track.  A track is a contact that exists from
//! `first_tick` through `last_tick` inclusive, moving in a straight line
//! from `(x, y, z)` at `(vx, vy, vz)` meters per second.
//!
//! ```csv
//! track_id,first_tick,last_tick,x,y,z,vx,vy,vz,kind,iff
//! 900,0,600,4000,0,3000,-5,0,0,radar,
//! 901,120,600,-2500,40,2600,0,0,-8,thermal,hostile;fast
//! 902,0,300,0,60,8000,0,0,0,transponder,friend
//! ```
//!
//! **`kind`** is one of `radar`, `optical`, `thermal`, `transponder`.
//! **`iff`** is a `;`-separated code list; leave it empty for no codes.
//!
//! Row order matters: the contact feed handed to trackers each tick keeps the
//! file order, and target selection walks that feed front to back.  Put the
//! highest-priority tracks first.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use gw_core::{DetectionKind, EntityId, FusedDetection, Tick, Vec3};

use crate::SimError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TrackRecord {
    track_id:   u64,
    first_tick: u64,
    last_tick:  u64,
    x:    f64,
    y:    f64,
    z:    f64,
    vx:   f64,
    vy:   f64,
    vz:   f64,
    kind: String,
    iff:  String,
}

// ── Tracks ────────────────────────────────────────────────────────────────────

/// One scripted contact with a lifetime window and linear motion.
#[derive(Clone, Debug)]
pub struct ScriptedTrack {
    pub entity:     EntityId,
    pub first_tick: Tick,
    pub last_tick:  Tick,
    /// Position at `first_tick`, meters.
    pub origin:     Vec3,
    /// Meters per second.
    pub velocity:   Vec3,
    pub kind:       DetectionKind,
    pub iff_codes:  Vec<String>,
}

impl ScriptedTrack {
    /// The track's detection at `tick`, or `None` outside its window.
    pub fn detection_at(&self, tick: Tick, secs_per_tick: f64) -> Option<FusedDetection> {
        if tick < self.first_tick || tick > self.last_tick {
            return None;
        }
        let elapsed = tick.since(self.first_tick) as f64 * secs_per_tick;
        Some(FusedDetection {
            entity:            self.entity,
            position:          self.origin + self.velocity * elapsed,
            velocity:          Some(self.velocity),
            velocity_variance: None,
            iff_codes:         self.iff_codes.clone(),
            kind:              self.kind,
        })
    }
}

/// An ordered set of scripted tracks, fed to the server each tick.
#[derive(Clone, Debug, Default)]
pub struct Scenario {
    pub tracks: Vec<ScriptedTrack>,
}

impl Scenario {
    pub fn new(tracks: Vec<ScriptedTrack>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The contact picture at `tick`, in track file order.
    pub fn detections_at(&self, tick: Tick, secs_per_tick: f64) -> Vec<FusedDetection> {
        self.tracks
            .iter()
            .filter_map(|t| t.detection_at(tick, secs_per_tick))
            .collect()
    }

    /// The tick after which no track produces detections.
    pub fn last_tick(&self) -> Tick {
        self.tracks
            .iter()
            .map(|t| t.last_tick)
            .max()
            .unwrap_or(Tick::ZERO)
    }
}

impl From<Vec<ScriptedTrack>> for Scenario {
    fn from(tracks: Vec<ScriptedTrack>) -> Self {
        Self::new(tracks)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a scripted scenario from a CSV file.
pub fn load_tracks_csv(path: &Path) -> Result<Scenario, SimError> {
    let file = std::fs::File::open(path).map_err(SimError::Io)?;
    load_tracks_reader(file)
}

/// Like [`load_tracks_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding a scenario in
/// a binary.
pub fn load_tracks_reader<R: Read>(reader: R) -> Result<Scenario, SimError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut tracks = Vec::new();

    for result in csv_reader.deserialize::<TrackRecord>() {
        let row = result.map_err(|e| SimError::Parse(e.to_string()))?;
        if row.last_tick < row.first_tick {
            return Err(SimError::Parse(format!(
                "track {}: last_tick {} before first_tick {}",
                row.track_id, row.last_tick, row.first_tick
            )));
        }
        tracks.push(ScriptedTrack {
            entity:     EntityId(row.track_id),
            first_tick: Tick(row.first_tick),
            last_tick:  Tick(row.last_tick),
            origin:     Vec3::new(row.x, row.y, row.z),
            velocity:   Vec3::new(row.vx, row.vy, row.vz),
            kind:       parse_kind(&row.kind)?,
            iff_codes:  parse_iff(&row.iff),
        });
    }

    Ok(Scenario::new(tracks))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_kind(s: &str) -> Result<DetectionKind, SimError> {
    match s.trim() {
        "radar"       => Ok(DetectionKind::Radar),
        "optical"     => Ok(DetectionKind::Optical),
        "thermal"     => Ok(DetectionKind::Thermal),
        "transponder" => Ok(DetectionKind::Transponder),
        other => Err(SimError::Parse(format!(
            "invalid kind {other:?}: expected \"radar\", \"optical\", \"thermal\", or \"transponder\""
        ))),
    }
}

fn parse_iff(s: &str) -> Vec<String> {
    s.split(';')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
