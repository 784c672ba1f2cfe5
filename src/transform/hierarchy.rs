//! Local/world pose propagation through the part hierarchy.

use crate::foundation::math::signum;
use crate::rig::pose::Pose;
use crate::transform::linear::{div_components, mul_components, rotate};

/// Flip factor a parent's scale applies to child rotation.
#[inline]
fn flip_product(parent: &Pose) -> f64 {
    signum(parent.scale.x) * signum(parent.scale.y)
}

/// Compose `local` with an already-resolved world-space `parent`.
///
/// Pivot, alpha, asset and kind pass through from `local` unchanged.
pub fn to_world(local: &Pose, parent: &Pose) -> Pose {
    Pose {
        angle: local.angle * flip_product(parent) + parent.angle,
        scale: mul_components(local.scale, parent.scale),
        position: rotate(mul_components(local.position, parent.scale), parent.angle)
            + parent.position,
        ..*local
    }
}

/// Inverse of [`to_world`]; `parent` must have nonzero scale on both axes.
pub fn to_local(world: &Pose, parent: &Pose) -> Pose {
    Pose {
        angle: (world.angle - parent.angle) / flip_product(parent),
        scale: div_components(world.scale, parent.scale),
        position: div_components(
            rotate(world.position - parent.position, -parent.angle),
            parent.scale,
        ),
        ..*world
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/hierarchy.rs"]
mod tests;
