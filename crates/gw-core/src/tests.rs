//! Unit tests for gw-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EntityId, PeerId};

    #[test]
    fn ordering() {
        assert!(EntityId(0) < EntityId(1));
        assert!(PeerId(100) > PeerId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(EntityId::INVALID.0, u64::MAX);
        assert_eq!(PeerId::INVALID.0, u64::MAX);
        assert!(!EntityId::INVALID.is_valid());
        assert!(EntityId(0).is_valid());
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(EntityId::default(), EntityId::INVALID);
    }

    #[test]
    fn server_peer_is_zero() {
        assert_eq!(PeerId::SERVER, PeerId(0));
        assert!(PeerId::SERVER.is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(EntityId(7).to_string(), "EntityId(7)");
        assert_eq!(PeerId(3).to_string(), "PeerId(3)");
    }

    #[test]
    fn raw_roundtrip() {
        let id = EntityId::from(42u64);
        assert_eq!(u64::from(id), 42);
    }
}

#[cfg(test)]
mod vec {
    use crate::Vec3;

    #[test]
    fn distance() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance_squared(b), 25.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn normalized_unit_length() {
        let v = Vec3::new(10.0, 0.0, 0.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert_eq!(v, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn normalized_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn operators() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn azimuth_along_axes() {
        use std::f64::consts::FRAC_PI_2;
        let (az, el) = Vec3::new(0.0, 0.0, 1.0).azimuth_elevation();
        assert!(az.abs() < 1e-12 && el.abs() < 1e-12);
        let (az, _) = Vec3::new(1.0, 0.0, 0.0).azimuth_elevation();
        assert!((az - FRAC_PI_2).abs() < 1e-12);
        let (_, el) = Vec3::new(0.0, 1.0, 0.0).azimuth_elevation();
        assert!((el - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn azimuth_of_zero_direction() {
        assert_eq!(Vec3::ZERO.azimuth_elevation(), (0.0, 0.0));
    }
}

#[cfg(test)]
mod time {
    use crate::{Tick, TickClock};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = TickClock::new(60);
        assert_eq!(clock.elapsed_secs(), 0.0);
        for _ in 0..60 {
            clock.advance();
        }
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = TickClock::new(60);
        assert_eq!(clock.ticks_for_secs(1.0), 60);
        assert_eq!(clock.ticks_for_secs(0.001), 1);
        assert_eq!(clock.ticks_for_secs(0.0), 0);
    }

    #[test]
    fn zero_rate_clamped() {
        let clock = TickClock::new(0);
        assert_eq!(clock.ticks_per_second, 1);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn children_diverge() {
        let mut root_a = SimRng::new(1);
        let mut root_b = SimRng::new(1);
        let mut c0 = root_a.child(0);
        let mut c1 = root_b.child(1);
        let a: u64 = c0.random();
        let b: u64 = c1.random();
        assert_ne!(a, b, "children at adjacent offsets should diverge");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}

#[cfg(test)]
mod detection {
    use crate::{DetectionKind, EntityId, FusedDetection, Vec3};

    #[test]
    fn code_matching() {
        let mut d = FusedDetection::at(EntityId(1), Vec3::ZERO, DetectionKind::Transponder);
        d.iff_codes = vec!["CIV-7712".into()];
        assert!(d.matches_codes(&["CIV-7712".into()]));
        assert!(!d.matches_codes(&["MIL-0001".into()]));
        assert!(!d.matches_codes(&[]));
    }

    #[test]
    fn silent_track_never_matches() {
        let d = FusedDetection::at(EntityId(1), Vec3::ZERO, DetectionKind::Radar);
        assert!(!d.matches_codes(&["CIV-7712".into()]));
    }

    #[test]
    fn kind_display() {
        assert_eq!(DetectionKind::Radar.to_string(), "radar");
        assert_eq!(DetectionKind::Transponder.to_string(), "transponder");
    }
}
