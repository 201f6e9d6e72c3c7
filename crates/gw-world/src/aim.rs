//! Aim-envelope and line-of-sight seams.
//!
//! # Pluggability
//!
//! Target selection asks two physics questions it cannot answer itself: can
//! this mount ever point at that spot, and is the view out of the owning
//! structure clear?  Both go through the [`AimOracle`] trait so hosts can
//! wire in real engine raycasts.  [`SphereOccluder`] is the built-in
//! implementation, modelling structures as blocker spheres; [`OpenField`]
//! answers "always clear" and is what most unit tests use.
//!
//! # Thread safety
//!
//! Implementations must be `Send + Sync` so independent endpoints can be
//! ticked from worker threads while sharing one oracle.

use gw_core::Vec3;

use crate::mount::MountDef;

/// Pluggable physics oracle for aiming decisions.
pub trait AimOracle: Send + Sync {
    /// Could `def`, mounted at `sensor_pos`, ever point at `target`?  The
    /// default implementation checks the mount's mechanical envelope only.
    fn can_aim_at(&self, sensor_pos: Vec3, def: &MountDef, target: Vec3) -> bool {
        let (az, el) = (target - sensor_pos).azimuth_elevation();
        def.contains(az, el)
    }

    /// Is the open segment from `origin` to `target` occluded by world
    /// geometry?
    fn line_of_sight_blocked(&self, origin: Vec3, target: Vec3) -> bool;
}

/// Oracle for empty space: every aim is reachable, nothing occludes.
pub struct OpenField;

impl AimOracle for OpenField {
    fn line_of_sight_blocked(&self, _origin: Vec3, _target: Vec3) -> bool {
        false
    }
}

/// A spherical piece of occluding geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius: radius.max(0.0) }
    }

    /// Does the segment `a..b` pass through this sphere?
    pub fn intersects_segment(&self, a: Vec3, b: Vec3) -> bool {
        let d = b - a;
        let len_sq = d.length_squared();
        let t = if len_sq < 1e-12 {
            0.0
        } else {
            ((self.center - a).dot(d) / len_sq).clamp(0.0, 1.0)
        };
        let closest = a + d * t;
        closest.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Sphere-set occlusion oracle.
///
/// Hosts register one or more spheres per solid structure; the aim envelope
/// check is inherited from the trait default.
#[derive(Default)]
pub struct SphereOccluder {
    spheres: Vec<Sphere>,
}

impl SphereOccluder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl AimOracle for SphereOccluder {
    fn line_of_sight_blocked(&self, origin: Vec3, target: Vec3) -> bool {
        self.spheres.iter().any(|s| s.intersects_segment(origin, target))
    }
}
