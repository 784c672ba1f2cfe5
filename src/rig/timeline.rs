use crate::animation::curve::Curve;
use crate::foundation::error::{SpriterError, SpriterResult};
use crate::rig::pose::{PartKind, Pose, Spin};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Descriptive metadata of one rig part.
pub struct PartInfo {
    pub name: String,
    #[serde(default)]
    pub kind: PartKind,
    /// Nominal size (bone length, box extent).
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl PartInfo {
    pub fn new(name: impl Into<String>, kind: PartKind) -> Self {
        Self {
            name: name.into(),
            kind,
            width: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One authored sample of a part.
pub struct Keyframe {
    /// Milliseconds from animation start.
    pub time: i64,
    /// Shape of the segment leaving this key.
    #[serde(default)]
    pub curve: Curve,
    #[serde(default)]
    pub spin: Spin,
    #[serde(default)]
    pub pose: Pose,
}

impl Keyframe {
    pub fn new(time: i64, pose: Pose) -> Self {
        Self {
            time,
            curve: Curve::LINEAR,
            spin: Spin::Forward,
            pose,
        }
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = spin;
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Time-ordered keyframes of one rig part.
pub struct Timeline {
    /// Position inside the owning animation; assigned when the animation is built.
    #[serde(skip)]
    pub id: usize,
    #[serde(flatten)]
    pub info: PartInfo,
    pub keys: Vec<Keyframe>,
}

impl Timeline {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn kind(&self) -> PartKind {
        self.info.kind
    }

    /// Key following `index`, wrapping to the first key after the last one.
    pub fn next_key(&self, index: usize) -> &Keyframe {
        &self.keys[(index + 1) % self.keys.len()]
    }

    /// Check ordering and range of keys against an animation of `length` ms.
    pub fn validate(&self, length: i64) -> SpriterResult<()> {
        if self.keys.is_empty() {
            return Err(SpriterError::validation(format!(
                "timeline '{}' has no keys",
                self.info.name
            )));
        }
        for (i, key) in self.keys.iter().enumerate() {
            if key.time < 0 || key.time > length {
                return Err(SpriterError::validation(format!(
                    "timeline '{}' key {i} time {} is outside 0..={length}",
                    self.info.name, key.time
                )));
            }
            if i > 0 && key.time < self.keys[i - 1].time {
                return Err(SpriterError::validation(format!(
                    "timeline '{}' keys are not time-ordered at key {i}",
                    self.info.name
                )));
            }
        }
        Ok(())
    }

    /// Stamp the part kind onto every key pose.
    pub(crate) fn normalize(&mut self, id: usize) {
        self.id = id;
        let kind = self.info.kind;
        for key in &mut self.keys {
            key.pose.kind = kind;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/timeline.rs"]
mod tests;
