use super::*;

const FRACTIONS: [f64; 9] = [0.0, 0.1, 0.25, 0.4, 0.5, 0.6, 0.75, 0.9, 1.0];

fn all_curves() -> Vec<Curve> {
    vec![
        Curve::LINEAR,
        Curve::INSTANT,
        Curve::quadratic(0.3),
        Curve::cubic(0.2, 0.9),
        Curve::quartic(0.1, 0.5, 0.8),
        Curve::quintic(0.1, 0.4, 0.6, 0.95),
        Curve::bezier(0.42, 0.0, 0.58, 1.0),
    ]
}

#[test]
fn equal_endpoints_are_fixed_points() {
    for curve in all_curves() {
        for a in [-3.5, 0.0, 1.25, 720.0] {
            let mut cache = RootCache::default();
            for t in FRACTIONS {
                assert_eq!(curve.interpolate(a, a, t, &mut cache), a, "{curve:?} t={t}");
                assert_eq!(curve.interpolate_angle(a, a, t, &mut cache), a, "{curve:?} t={t}");
            }
        }
    }
}

#[test]
fn linear_is_exact_blend() {
    let mut cache = RootCache::default();
    let (a, b) = (2.0, 10.0);
    for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
        assert_eq!(Curve::LINEAR.interpolate(a, b, t, &mut cache), a + (b - a) * t);
    }
}

#[test]
fn instant_never_reaches_end_within_segment() {
    let mut cache = RootCache::default();
    for t in [0.0, 0.3, 0.5, 0.99, 0.999_999] {
        assert_eq!(Curve::INSTANT.interpolate(1.0, 9.0, t, &mut cache), 1.0);
    }
}

#[test]
fn polynomial_curves_hit_endpoints() {
    let mut cache = RootCache::default();
    for curve in all_curves().into_iter().filter(|c| c.kind != CurveKind::Instant) {
        let start = curve.interpolate(4.0, 12.0, 0.0, &mut cache);
        let end = curve.interpolate(4.0, 12.0, 1.0, &mut cache);
        assert!((start - 4.0).abs() < 1e-9, "{curve:?}");
        assert!((end - 12.0).abs() < 1e-9, "{curve:?}");
    }
}

#[test]
fn quadratic_matches_bernstein_form() {
    let mut cache = RootCache::default();
    let c = 0.3;
    let (a, b) = (0.0, 10.0);
    let mid = a + (b - a) * c;
    for t in FRACTIONS {
        let u = 1.0 - t;
        let expected = u * u * a + 2.0 * u * t * mid + t * t * b;
        let got = Curve::quadratic(c).interpolate(a, b, t, &mut cache);
        assert!((got - expected).abs() < 1e-9);
    }
}

#[test]
fn bezier_ease_is_symmetric_and_monotonic() {
    let curve = Curve::bezier(0.42, 0.0, 0.58, 1.0);
    let mut cache = RootCache::default();
    let mid = curve.interpolate(0.0, 1.0, 0.5, &mut cache);
    assert!((mid - 0.5).abs() < 1e-6);

    let mut prev = f64::NEG_INFINITY;
    for i in 0..=20 {
        let v = curve.interpolate(0.0, 1.0, f64::from(i) / 20.0, &mut cache);
        assert!(v >= prev - 1e-12);
        prev = v;
    }
    assert!(cache.last().is_some());
}

#[test]
fn bezier_linear_controls_are_identity() {
    let curve = Curve::bezier(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
    let mut cache = RootCache::default();
    for t in FRACTIONS {
        let v = curve.interpolate(0.0, 1.0, t, &mut cache);
        assert!((v - t).abs() < 1e-6, "t={t} v={v}");
    }
}

#[test]
fn unsolvable_bezier_reuses_cached_root() {
    let curve = Curve::bezier(0.42, 0.0, 0.58, 1.0);
    let mut cache = RootCache::default();
    curve.interpolate(0.0, 1.0, 0.5, &mut cache);
    let cached = cache.last().unwrap();
    // x(u) never reaches 2 on [0, 1].
    let v = curve.interpolate(0.0, 1.0, 2.0, &mut cache);
    assert_eq!(cache.last(), Some(cached));
    assert!((v - bezier(cached, 0.0, 0.0, 1.0, 1.0)).abs() < 1e-12);
}

#[test]
fn unsolvable_bezier_without_cache_uses_fraction() {
    let curve = Curve::bezier(0.42, 0.0, 0.58, 1.0);
    let mut cache = RootCache::default();
    let v = curve.interpolate(0.0, 1.0, 2.0, &mut cache);
    assert!(cache.last().is_none());
    assert!((v - bezier(2.0, 0.0, 0.0, 1.0, 1.0)).abs() < 1e-12);
}

#[test]
fn non_finite_fraction_snaps_to_end() {
    let mut cache = RootCache::default();
    assert_eq!(Curve::LINEAR.interpolate(1.0, 5.0, f64::NAN, &mut cache), 5.0);
    assert_eq!(Curve::LINEAR.interpolate(1.0, 5.0, f64::INFINITY, &mut cache), 5.0);
    let v = Curve::cubic(0.3, 0.7).interpolate(1.0, 5.0, f64::NEG_INFINITY, &mut cache);
    assert!((v - 5.0).abs() < 1e-12);
}

#[test]
fn shortest_arc_wraps_through_pi() {
    let mut cache = RootCache::default();
    let a = 170f64.to_radians();
    let b = (-170f64).to_radians();
    let mid = Curve::LINEAR.interpolate_angle(a, b, 0.5, &mut cache);
    assert!((mid - 180f64.to_radians()).abs() < 1e-9, "{}", mid.to_degrees());
}

#[test]
fn forward_spin_increases_through_zero() {
    let mut cache = RootCache::default();
    let (a, b) = (350f64.to_radians(), 10f64.to_radians());
    let mut prev = f64::NEG_INFINITY;
    for i in 0..=10 {
        let v = Curve::LINEAR.interpolate_angle_with_spin(
            a,
            b,
            f64::from(i) / 10.0,
            Spin::Forward,
            &mut cache,
        );
        assert!(v > prev);
        prev = v;
    }
    assert!((prev - 370f64.to_radians()).abs() < 1e-9);
}

#[test]
fn backward_spin_decreases() {
    let mut cache = RootCache::default();
    let (a, b) = (350f64.to_radians(), 10f64.to_radians());
    let mut prev = f64::INFINITY;
    for i in 0..=10 {
        let v = Curve::LINEAR.interpolate_angle_with_spin(
            a,
            b,
            f64::from(i) / 10.0,
            Spin::Backward,
            &mut cache,
        );
        assert!(v < prev);
        prev = v;
    }
    assert!((prev - b).abs() < 1e-9);
}

#[test]
fn no_spin_holds_start() {
    let mut cache = RootCache::default();
    let (a, b) = (350f64.to_radians(), 10f64.to_radians());
    for t in FRACTIONS {
        assert_eq!(
            Curve::LINEAR.interpolate_angle_with_spin(a, b, t, Spin::None, &mut cache),
            a
        );
    }
}

#[test]
fn curve_json_defaults_to_linear() {
    let c: Curve = serde_json::from_str("{}").unwrap();
    assert_eq!(c, Curve::LINEAR);
    let c: Curve =
        serde_json::from_str(r#"{"kind":"bezier","constraints":[0.1,0.2,0.3,0.4]}"#).unwrap();
    assert_eq!(c, Curve::bezier(0.1, 0.2, 0.3, 0.4));
}
