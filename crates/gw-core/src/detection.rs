//! Fused detection records — the per-tick picture handed to target selection.
//!
//! The aggregation pipeline that produces these lives host-side; this crate
//! only defines the record shape.  Slices of `FusedDetection` are expected to
//! arrive pre-sorted from the highest-priority sensing band down, so
//! downstream consumers can rely on iteration order as priority order.

use std::fmt;

use crate::ids::EntityId;
use crate::vec::Vec3;

/// The sensing band a fused detection was confirmed on.
///
/// Variants are declared from highest to lowest track quality.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectionKind {
    /// Active radar return with range and rate.
    #[default]
    Radar,
    /// Optical track, angle-only unless rangefinder-assisted.
    Optical,
    /// Infrared signature.
    Thermal,
    /// Cooperative transponder squawk.
    Transponder,
}

impl DetectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionKind::Radar       => "radar",
            DetectionKind::Optical     => "optical",
            DetectionKind::Thermal     => "thermal",
            DetectionKind::Transponder => "transponder",
        }
    }
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fused track: a world object the sensing pipeline currently sees.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FusedDetection {
    /// World object this track resolved to.
    pub entity: EntityId,
    /// Estimated position, world space.
    pub position: Vec3,
    /// Estimated velocity, if the band provides rate information.
    pub velocity: Option<Vec3>,
    /// Scalar variance of the velocity estimate (m²/s²), if available.
    pub velocity_variance: Option<f64>,
    /// Identity codes the track is squawking, empty when silent.
    pub iff_codes: Vec<String>,
    /// Band the track was confirmed on.
    pub kind: DetectionKind,
}

impl FusedDetection {
    /// A bare position-only track with no rate or identity data.
    pub fn at(entity: EntityId, position: Vec3, kind: DetectionKind) -> Self {
        Self {
            entity,
            position,
            velocity: None,
            velocity_variance: None,
            iff_codes: Vec::new(),
            kind,
        }
    }

    /// Does any squawked code appear in `friendly`?  Both sides empty or
    /// disjoint means "not recognized as friendly".
    pub fn matches_codes(&self, friendly: &[String]) -> bool {
        self.iff_codes.iter().any(|c| friendly.iter().any(|f| f == c))
    }
}
