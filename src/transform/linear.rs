//! Linear transform helpers.

use crate::foundation::core::Vec2;

#[inline]
/// Rotate `v` counter-clockwise by `angle` radians around the origin.
pub fn rotate(v: Vec2, angle: f64) -> Vec2 {
    if v.x == 0.0 && v.y == 0.0 {
        return v;
    }
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[inline]
/// Componentwise product.
pub fn mul_components(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x, a.y * b.y)
}

#[inline]
/// Componentwise quotient.
pub fn div_components(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x / b.x, a.y / b.y)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/linear.rs"]
mod tests;
