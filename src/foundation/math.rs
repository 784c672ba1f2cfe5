//! Scalar interpolation and root-finding primitives shared by curves and the resolver.

use std::f64::consts::{PI, TAU};

/// Replace NaN/infinite fractions with `1.0` (snap to segment end).
#[inline]
pub fn sanitize_fraction(t: f64) -> f64 {
    if t.is_finite() { t } else { 1.0 }
}

/// Sign of `f` that keeps `0.0` and NaN as-is, unlike [`f64::signum`].
#[inline]
pub fn signum(f: f64) -> f64 {
    if f == 0.0 || f.is_nan() {
        f
    } else {
        1.0_f64.copysign(f)
    }
}

/// Signed delta from `a` to `b` along the shorter arc, in `(-PI, PI]`.
#[inline]
pub fn shortest_arc(a: f64, b: f64) -> f64 {
    let d = (b - a).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a) * t + a
}

#[inline]
pub fn lerp_angle(a: f64, b: f64, t: f64) -> f64 {
    a + shortest_arc(a, b) * t
}

/// Collapse a control polygon with repeated pairwise blends and return the final ordinate.
///
/// Three points give the quadratic form, six the quintic one.
pub fn de_casteljau(points: &mut [f64], t: f64, blend: fn(f64, f64, f64) -> f64) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let mut n = points.len();
    while n > 1 {
        for i in 0..n - 1 {
            points[i] = blend(points[i], points[i + 1], t);
        }
        n -= 1;
    }
    points[0]
}

/// Cubic Bernstein form with four ordinates.
#[inline]
pub fn bezier(t: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Slack allowed around `[0, 1]` before a root is rejected.
const ROOT_EPSILON: f64 = 1e-9;
/// Leading coefficients below this magnitude drop the polynomial one degree.
const DEGENERATE_COEFF: f64 = 1e-12;

/// Accept `r` when it lies in `[0, 1]` up to rounding, clamped into the interval.
#[inline]
fn unit_root(r: f64) -> Option<f64> {
    (-ROOT_EPSILON..=1.0 + ROOT_EPSILON)
        .contains(&r)
        .then(|| r.clamp(0.0, 1.0))
}

/// First real root of `a·x³ + b·x² + c·x + d` inside `[0, 1]`, closed form.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Option<f64> {
    if a.abs() < DEGENERATE_COEFF {
        return solve_quadratic(b, c, d);
    }
    if d == 0.0 {
        return Some(0.0);
    }

    let b = b / a;
    let c = c / a;
    let d = d / a;
    let b2 = b * b;
    let q = (3.0 * c - b2) / 9.0;
    let r = (-27.0 * d + b * (9.0 * c - 2.0 * b2)) / 54.0;
    let disc = q * q * q + r * r;
    let term1 = b / 3.0;

    if disc > 0.0 {
        let sq = disc.sqrt();
        let s = (r + sq).cbrt();
        let t = (r - sq).cbrt();
        return unit_root(-term1 + s + t);
    }

    if disc == 0.0 {
        let r13 = r.cbrt();
        return [-term1 + 2.0 * r13, -(r13 + term1)]
            .into_iter()
            .find_map(unit_root);
    }

    let q = -q;
    let theta = (r / (q * q * q).sqrt()).acos();
    let r13 = 2.0 * q.sqrt();
    [0.0, TAU, 2.0 * TAU]
        .into_iter()
        .map(|k| -term1 + r13 * ((theta + k) / 3.0).cos())
        .find_map(unit_root)
}

/// First real root of `a·x² + b·x + c` inside `[0, 1]`; degrades to the linear case when `a == 0`.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<f64> {
    if a.abs() < DEGENERATE_COEFF {
        if b == 0.0 {
            return None;
        }
        return unit_root(-c / b);
    }
    let sq = (b * b - 4.0 * a * c).sqrt();
    let two_a = 2.0 * a;
    [(-b + sq) / two_a, (-b - sq) / two_a]
        .into_iter()
        .find_map(unit_root)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
