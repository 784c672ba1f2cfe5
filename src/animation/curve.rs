use crate::foundation::core::Vec2;
use crate::foundation::math::{
    bezier, de_casteljau, lerp, lerp_angle, sanitize_fraction, solve_cubic,
};
use crate::rig::pose::Spin;

use std::f64::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Shape family of a keyframe segment.
pub enum CurveKind {
    #[default]
    Linear,
    /// Holds the start value for the whole segment.
    Instant,
    Quadratic,
    Cubic,
    Quartic,
    Quintic,
    /// Cubic Bezier through (0,0), (c0,c1), (c2,c3), (1,1).
    Bezier,
}

impl CurveKind {
    /// Number of shape constraints the kind reads.
    pub fn constraint_count(self) -> usize {
        match self {
            Self::Linear | Self::Instant => 0,
            Self::Quadratic => 1,
            Self::Cubic => 2,
            Self::Quartic => 3,
            Self::Quintic | Self::Bezier => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Timing curve of one segment. Pure data; shareable across players.
pub struct Curve {
    #[serde(default)]
    pub kind: CurveKind,
    /// Shape constraints in `[0, 1]`; unused slots are ignored.
    #[serde(default)]
    pub constraints: [f64; 4],
}

/// Last Bezier root successfully solved for one curve user.
///
/// Degenerate Bezier shapes can have no root in `[0, 1]` for some fractions; evaluation then
/// reuses the cached root so the motion stays continuous.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootCache {
    last: Option<f64>,
}

impl RootCache {
    /// Most recently solved root, if any.
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Returns `root` and remembers it, or falls back to the cache, or to `t` when the cache is
    /// empty.
    fn settle(&mut self, root: Option<f64>, t: f64) -> f64 {
        match root {
            Some(r) => {
                self.last = Some(r);
                r
            }
            None => self.last.unwrap_or(t),
        }
    }
}

impl Curve {
    pub const LINEAR: Self = Self {
        kind: CurveKind::Linear,
        constraints: [0.0; 4],
    };

    pub const INSTANT: Self = Self {
        kind: CurveKind::Instant,
        constraints: [0.0; 4],
    };

    pub fn new(kind: CurveKind, constraints: [f64; 4]) -> Self {
        Self { kind, constraints }
    }

    pub fn quadratic(c0: f64) -> Self {
        Self::new(CurveKind::Quadratic, [c0, 0.0, 0.0, 0.0])
    }

    pub fn cubic(c0: f64, c1: f64) -> Self {
        Self::new(CurveKind::Cubic, [c0, c1, 0.0, 0.0])
    }

    pub fn quartic(c0: f64, c1: f64, c2: f64) -> Self {
        Self::new(CurveKind::Quartic, [c0, c1, c2, 0.0])
    }

    pub fn quintic(c0: f64, c1: f64, c2: f64, c3: f64) -> Self {
        Self::new(CurveKind::Quintic, [c0, c1, c2, c3])
    }

    /// Bezier with interior control points `(x1, y1)` and `(x2, y2)`.
    pub fn bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(CurveKind::Bezier, [x1, y1, x2, y2])
    }

    /// Blend `a..b` at fraction `t` along this curve.
    pub fn interpolate(&self, a: f64, b: f64, t: f64, cache: &mut RootCache) -> f64 {
        self.eval(a, b, sanitize_fraction(t), cache, lerp)
    }

    /// Per-axis [`Curve::interpolate`].
    pub fn interpolate_point(&self, a: Vec2, b: Vec2, t: f64, cache: &mut RootCache) -> Vec2 {
        Vec2::new(
            self.interpolate(a.x, b.x, t, cache),
            self.interpolate(a.y, b.y, t, cache),
        )
    }

    /// Like [`Curve::interpolate`] but every blend takes the shorter arc.
    pub fn interpolate_angle(&self, a: f64, b: f64, t: f64, cache: &mut RootCache) -> f64 {
        self.eval(a, b, sanitize_fraction(t), cache, lerp_angle)
    }

    /// Blend two angles with an explicit winding direction.
    ///
    /// `Spin::None` holds `a`. Forward and backward unwrap `b` by one turn when it lies on the
    /// wrong side of `a`, then blend plainly.
    pub fn interpolate_angle_with_spin(
        &self,
        a: f64,
        b: f64,
        t: f64,
        spin: Spin,
        cache: &mut RootCache,
    ) -> f64 {
        let b = match spin {
            Spin::None => return a,
            Spin::Forward if b < a => b + TAU,
            Spin::Backward if b > a => b - TAU,
            _ => b,
        };
        self.interpolate(a, b, t, cache)
    }

    fn eval(
        &self,
        a: f64,
        b: f64,
        t: f64,
        cache: &mut RootCache,
        blend: fn(f64, f64, f64) -> f64,
    ) -> f64 {
        let c = &self.constraints;
        match self.kind {
            CurveKind::Instant => a,
            CurveKind::Linear => blend(a, b, t),
            CurveKind::Bezier => {
                let root = solve_cubic(
                    3.0 * (c[0] - c[2]) + 1.0,
                    3.0 * (c[2] - 2.0 * c[0]),
                    3.0 * c[0],
                    -t,
                );
                let u = cache.settle(root, t);
                blend(a, b, bezier(u, 0.0, c[1], c[3], 1.0))
            }
            kind => {
                let n = kind.constraint_count();
                let mut points = [0.0; 6];
                points[0] = a;
                for (slot, &ci) in points[1..=n].iter_mut().zip(c.iter()) {
                    *slot = blend(a, b, ci);
                }
                points[n + 1] = b;
                de_casteljau(&mut points[..n + 2], t, blend)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
