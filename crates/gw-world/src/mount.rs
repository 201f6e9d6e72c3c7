//! Directional sensor mount definitions and state.

use std::f64::consts::PI;

/// Mechanical envelope of a two-axis directional mount.
///
/// Angles are radians in the mount frame, which this runtime assumes is
/// world-aligned: azimuth in the XZ ground plane (0 along +Z), elevation
/// above it.  An axis flagged for full rotation ignores its min/max pair and
/// may wrap through ±PI; a limited axis must stay inside `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MountDef {
    pub min_azimuth_rad:   f64,
    pub max_azimuth_rad:   f64,
    pub min_elevation_rad: f64,
    pub max_elevation_rad: f64,

    /// Maximum angular speed per axis, radians per second.  A rate of 0 on
    /// both axes marks the mount as immobile.
    pub max_azimuth_rate:   f64,
    pub max_elevation_rate: f64,

    /// Rest orientation the mount returns to when it has nothing to track.
    pub home_azimuth_rad:   f64,
    pub home_elevation_rad: f64,

    /// Continuous rotation capability per axis.
    pub full_azimuth_rotation:   bool,
    pub full_elevation_rotation: bool,
}

impl MountDef {
    /// A turret-style mount: free azimuth spin, elevation limited to
    /// `[-15°, +60°]`, 90°/s slew on both axes, home facing +Z level.
    pub fn turret() -> Self {
        Self {
            min_azimuth_rad:         -PI,
            max_azimuth_rad:         PI,
            min_elevation_rad:       -15f64.to_radians(),
            max_elevation_rad:       60f64.to_radians(),
            max_azimuth_rate:        90f64.to_radians(),
            max_elevation_rate:      90f64.to_radians(),
            home_azimuth_rad:        0.0,
            home_elevation_rad:      0.0,
            full_azimuth_rotation:   true,
            full_elevation_rotation: false,
        }
    }

    /// `true` when neither axis can move.
    #[inline]
    pub fn is_immobile(&self) -> bool {
        self.max_azimuth_rate <= 0.0 && self.max_elevation_rate <= 0.0
    }

    /// Both angles inside the mount's mechanical envelope?
    pub fn contains(&self, azimuth_rad: f64, elevation_rad: f64) -> bool {
        let az_ok = self.full_azimuth_rotation
            || (self.min_azimuth_rad..=self.max_azimuth_rad).contains(&azimuth_rad);
        let el_ok = self.full_elevation_rotation
            || (self.min_elevation_rad..=self.max_elevation_rad).contains(&elevation_rad);
        az_ok && el_ok
    }

    /// Reject definitions the slewing math cannot handle.  Limited axes need
    /// a non-inverted range containing the home angle; rates and angles must
    /// be finite.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            self.min_azimuth_rad,
            self.max_azimuth_rad,
            self.min_elevation_rad,
            self.max_elevation_rad,
            self.max_azimuth_rate,
            self.max_elevation_rate,
            self.home_azimuth_rad,
            self.home_elevation_rad,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err("non-finite angle or rate".into());
        }
        if self.max_azimuth_rate < 0.0 || self.max_elevation_rate < 0.0 {
            return Err("negative slew rate".into());
        }
        if !self.full_azimuth_rotation {
            if self.min_azimuth_rad > self.max_azimuth_rad {
                return Err("inverted azimuth limits".into());
            }
            if !(self.min_azimuth_rad..=self.max_azimuth_rad).contains(&self.home_azimuth_rad) {
                return Err("home azimuth outside limits".into());
            }
        }
        if !self.full_elevation_rotation {
            if self.min_elevation_rad > self.max_elevation_rad {
                return Err("inverted elevation limits".into());
            }
            if !(self.min_elevation_rad..=self.max_elevation_rad).contains(&self.home_elevation_rad)
            {
                return Err("home elevation outside limits".into());
            }
        }
        Ok(())
    }
}

/// Instantaneous orientation of a mount, plus the scan direction used by
/// sweep stepping.
#[derive(Debug, Clone, PartialEq)]
pub struct MountState {
    pub azimuth_rad:   f64,
    pub elevation_rad: f64,
    /// +1.0 or -1.0; flipped by `slew::step_sweep` when a limit is reached.
    pub sweep_dir: f64,
}

impl MountState {
    /// Orientation at the definition's home position.
    #[inline]
    pub fn at_home(def: &MountDef) -> Self {
        Self {
            azimuth_rad:   def.home_azimuth_rad,
            elevation_rad: def.home_elevation_rad,
            sweep_dir:     1.0,
        }
    }
}

/// A validated definition paired with its live state.
#[derive(Debug, Clone)]
pub struct SensorMount {
    pub def:   MountDef,
    pub state: MountState,
}
