//! Affine transform helpers.

use crate::foundation::core::Affine;
use crate::rig::pose::Pose;

#[inline]
/// Canonical order: `T(position) * R(angle) * S(scale)`.
pub fn pose_affine(pose: &Pose) -> Affine {
    Affine::translate(pose.position)
        * Affine::rotate(pose.angle)
        * Affine::scale_non_uniform(pose.scale.x, pose.scale.y)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
