//! Rate-limited mount motion.
//!
//! # Design
//!
//! All movement is stepped once per tick from an `AimCommand`.  Each axis
//! moves independently, clamped to its configured maximum angular rate times
//! the tick duration.  A full-rotation axis takes the shortest wrapped path
//! to its goal; a limited axis clamps the goal into `[min, max]` and
//! approaches it directly.  Sweep stepping scans azimuth continuously,
//! flipping the scan direction sign when a limited axis reaches a limit.

use std::f64::consts::PI;

use gw_core::Vec3;

use crate::mount::SensorMount;

/// One tick's worth of aiming instruction for a single mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimCommand {
    /// Slew toward a world-space point.
    Target(Vec3),
    /// Scan azimuth back and forth at full rate inside a sector.  A half
    /// angle of PI or more on a free-spinning axis scans the whole circle.
    Sweep { center_rad: f64, half_angle_rad: f64 },
    /// Return to the definition's rest orientation.
    Home,
}

/// Normalize an angle to `(-PI, PI]`.
#[inline]
pub fn wrap_angle(a: f64) -> f64 {
    let w = (a + PI).rem_euclid(2.0 * PI) - PI;
    if w == -PI { PI } else { w }
}

/// Shortest signed rotation from `from` to `to`, in `[-PI, PI)`.
#[inline]
pub fn angle_delta(from: f64, to: f64) -> f64 {
    (to - from + PI).rem_euclid(2.0 * PI) - PI
}

/// Advance one axis toward `target` by at most `rate * dt`, honoring wrap
/// capability and limits.
fn step_axis(current: f64, target: f64, rate: f64, dt: f64, full_rotation: bool, min: f64, max: f64) -> f64 {
    let max_step = rate.max(0.0) * dt;
    if full_rotation {
        let delta = angle_delta(current, target);
        wrap_angle(current + delta.clamp(-max_step, max_step))
    } else {
        let goal = target.clamp(min, max);
        let delta = goal - current.clamp(min, max);
        (current.clamp(min, max) + delta.clamp(-max_step, max_step)).clamp(min, max)
    }
}

/// Step a mount toward a pair of goal angles.
pub fn step_toward(mount: &mut SensorMount, target_az: f64, target_el: f64, dt_secs: f64) {
    let def = mount.def.clone();
    mount.state.azimuth_rad = step_axis(
        mount.state.azimuth_rad,
        target_az,
        def.max_azimuth_rate,
        dt_secs,
        def.full_azimuth_rotation,
        def.min_azimuth_rad,
        def.max_azimuth_rad,
    );
    mount.state.elevation_rad = step_axis(
        mount.state.elevation_rad,
        target_el,
        def.max_elevation_rate,
        dt_secs,
        def.full_elevation_rotation,
        def.min_elevation_rad,
        def.max_elevation_rad,
    );
}

/// Scan azimuth at full rate in the stored sweep direction, flipping the
/// sign at the sector (or mount) limits.  Elevation returns to home.
///
/// The scanned sector is `[center - half, center + half]` intersected with
/// the mount's azimuth limits; a half angle of PI or more on a
/// full-rotation axis scans continuously instead of flipping.  An empty
/// intersection holds the mount where it is.
pub fn step_sweep(mount: &mut SensorMount, center_rad: f64, half_angle_rad: f64, dt_secs: f64) {
    let def = mount.def.clone();
    let state = &mut mount.state;
    let half = half_angle_rad.max(0.0);
    let step = def.max_azimuth_rate.max(0.0) * dt_secs * state.sweep_dir;

    if def.full_azimuth_rotation && half >= PI {
        state.azimuth_rad = wrap_angle(state.azimuth_rad + step);
    } else {
        let (lo, hi) = if def.full_azimuth_rotation {
            (center_rad - half, center_rad + half)
        } else {
            (
                def.min_azimuth_rad.max(center_rad - half),
                def.max_azimuth_rad.min(center_rad + half),
            )
        };
        if lo > hi {
            return;
        }
        let mut next = state.azimuth_rad + step;
        if next >= hi {
            next = hi;
            state.sweep_dir = -1.0;
        } else if next <= lo {
            next = lo;
            state.sweep_dir = 1.0;
        }
        state.azimuth_rad = next;
    }
    state.elevation_rad = step_axis(
        state.elevation_rad,
        def.home_elevation_rad,
        def.max_elevation_rate,
        dt_secs,
        def.full_elevation_rotation,
        def.min_elevation_rad,
        def.max_elevation_rad,
    );
}

/// Apply one tick of an `AimCommand` to a mount at `sensor_pos`.
pub fn apply_command(mount: &mut SensorMount, command: AimCommand, sensor_pos: Vec3, dt_secs: f64) {
    match command {
        AimCommand::Target(point) => {
            let (az, el) = (point - sensor_pos).azimuth_elevation();
            step_toward(mount, az, el, dt_secs);
        }
        AimCommand::Sweep { center_rad, half_angle_rad } => {
            step_sweep(mount, center_rad, half_angle_rad, dt_secs);
        }
        AimCommand::Home => {
            let (az, el) = (mount.def.home_azimuth_rad, mount.def.home_elevation_rad);
            step_toward(mount, az, el, dt_secs);
        }
    }
}
