use crate::foundation::core::{Affine, AssetRef, Vec2};
use crate::foundation::error::SpriterError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// What a rig part is, which decides how renderers treat its pose.
pub enum PartKind {
    /// Skeleton bone; never drawn, only parents other parts.
    Bone,
    /// Textured quad.
    #[default]
    Sprite,
    /// Action point (attachment/emitter position).
    Point,
    /// Collision or hit box.
    Box,
    /// Deformable skin (drawn like a sprite by this runtime).
    Skin,
}

impl PartKind {
    /// Whether a renderer draws an image for this kind.
    pub fn is_drawable(self) -> bool {
        matches!(self, Self::Sprite | Self::Skin)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Position/rotation/scale/opacity/asset state of one part, in local or world space.
pub struct Pose {
    /// Translation.
    #[serde(default)]
    pub position: Vec2,
    /// Per-axis scale; negative components flip.
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
    /// Normalized image pivot (drawable parts only).
    #[serde(default = "default_pivot")]
    pub pivot: Vec2,
    /// Rotation in radians.
    #[serde(default)]
    pub angle: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "opaque")]
    pub alpha: f64,
    /// Image shown by this part, if any.
    #[serde(default)]
    pub asset: Option<AssetRef>,
    /// Part kind copied from the keyframe.
    #[serde(default)]
    pub kind: PartKind,
}

fn unit_scale() -> Vec2 {
    Vec2::new(1.0, 1.0)
}

fn default_pivot() -> Vec2 {
    Vec2::new(0.0, 1.0)
}

fn opaque() -> f64 {
    1.0
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: unit_scale(),
            pivot: default_pivot(),
            angle: 0.0,
            alpha: opaque(),
            asset: None,
            kind: PartKind::Sprite,
        }
    }
}

impl Pose {
    /// Identity bone pose.
    pub fn bone() -> Self {
        Self {
            kind: PartKind::Bone,
            pivot: Vec2::new(0.0, 0.5),
            ..Self::default()
        }
    }

    /// Identity sprite pose showing `asset`.
    pub fn sprite(asset: AssetRef) -> Self {
        Self {
            asset: Some(asset),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_scale(mut self, x: f64, y: f64) -> Self {
        self.scale = Vec2::new(x, y);
        self
    }

    pub fn with_pivot(mut self, x: f64, y: f64) -> Self {
        self.pivot = Vec2::new(x, y);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// World matrix of this pose (translate, rotate, scale).
    pub fn to_affine(&self) -> Affine {
        crate::transform::affine::pose_affine(self)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "i8", into = "i8")]
/// Rotation winding selected for a keyframe segment.
pub enum Spin {
    /// Rotate with decreasing angles.
    Backward,
    /// Hold the start angle for the whole segment.
    None,
    /// Rotate with increasing angles.
    #[default]
    Forward,
}

impl TryFrom<i8> for Spin {
    type Error = SpriterError;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Self::Backward),
            0 => Ok(Self::None),
            1 => Ok(Self::Forward),
            other => Err(SpriterError::validation(format!(
                "spin must be -1, 0 or 1 (got {other})"
            ))),
        }
    }
}

impl From<Spin> for i8 {
    fn from(s: Spin) -> Self {
        match s {
            Spin::Backward => -1,
            Spin::None => 0,
            Spin::Forward => 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/pose.rs"]
mod tests;
