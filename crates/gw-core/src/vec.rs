//! Minimal 3D vector math for positions, aim directions, and range queries.
//!
//! # Design
//!
//! The host world hands us world-space positions in meters; everything this
//! framework does with them is covered by a handful of operations (distance,
//! normalization, dot products, angle extraction).  A small self-contained
//! type keeps the public API free of an external math crate.
//!
//! Range tests go through `distance_squared` so the common "is X within R of
//! Y" question never pays for a square root.

use std::ops::{Add, Mul, Neg, Sub};

/// A point or direction in world space, in meters.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Squared distance between two points — preferred for range tests.
    #[inline]
    pub fn distance_squared(self, other: Vec3) -> f64 {
        (self - other).length_squared()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Unit vector in the same direction, or `ZERO` if the length is too
    /// small to normalize meaningfully.
    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len < 1e-12 { Vec3::ZERO } else { self * (1.0 / len) }
    }

    /// Horizontal bearing and vertical angle of this direction, in radians.
    ///
    /// Azimuth is measured in the XZ ground plane, `atan2(x, z)` — 0 along
    /// +Z, positive toward +X, range `(-PI, PI]`.  Elevation is the angle
    /// above that plane, range `[-PI/2, PI/2]`.  A zero direction reports
    /// `(0, 0)`.
    pub fn azimuth_elevation(self) -> (f64, f64) {
        let flat = (self.x * self.x + self.z * self.z).sqrt();
        if flat < 1e-12 && self.y.abs() < 1e-12 {
            return (0.0, 0.0);
        }
        (self.x.atan2(self.z), self.y.atan2(flat))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}
