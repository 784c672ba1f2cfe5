use std::collections::BTreeMap;

use crate::foundation::error::{SpriterError, SpriterResult};
use crate::rig::mainline::{Binding, Mainline, MainlineKey};
use crate::rig::timeline::Timeline;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Index of an animation inside its entity.
pub struct AnimationId(pub usize);

impl AnimationId {
    /// Marks an animation built outside any entity; players accept it without an ownership check.
    pub const DETACHED: Self = Self(usize::MAX);

    pub fn is_detached(self) -> bool {
        self == Self::DETACHED
    }
}

fn default_looping() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// JSON-facing animation document.
pub struct AnimationDef {
    pub name: String,
    /// Length in milliseconds.
    pub length: i64,
    /// Authoring tick interval in milliseconds.
    #[serde(default)]
    pub interval: i64,
    #[serde(default = "default_looping")]
    pub looping: bool,
    pub mainline: Mainline,
    pub timelines: Vec<Timeline>,
}

#[derive(Clone, Debug)]
/// Validated, immutable animation.
pub struct Animation {
    id: AnimationId,
    name: String,
    length: i64,
    interval: i64,
    looping: bool,
    mainline: Mainline,
    timelines: Vec<Timeline>,
    by_name: BTreeMap<String, usize>,
}

impl Animation {
    /// Validate `def` and build the animation under `id`.
    pub fn from_def(id: AnimationId, def: AnimationDef) -> SpriterResult<Self> {
        let AnimationDef {
            name,
            length,
            interval,
            looping,
            mainline,
            mut timelines,
        } = def;

        if length <= 0 {
            return Err(SpriterError::validation(format!(
                "animation '{name}' length must be > 0 (got {length})"
            )));
        }
        if interval < 0 {
            return Err(SpriterError::validation(format!(
                "animation '{name}' interval must be >= 0"
            )));
        }
        validate_mainline(&name, &mainline, &timelines, length)?;

        let mut by_name = BTreeMap::new();
        for (i, tl) in timelines.iter_mut().enumerate() {
            tl.validate(length)?;
            tl.normalize(i);
            by_name.entry(tl.info.name.clone()).or_insert(i);
        }

        Ok(Self {
            id,
            name,
            length,
            interval,
            looping,
            mainline,
            timelines,
            by_name,
        })
    }

    /// Build an animation that belongs to no entity.
    pub fn detached(def: AnimationDef) -> SpriterResult<Self> {
        Self::from_def(AnimationId::DETACHED, def)
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in milliseconds.
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn interval(&self) -> i64 {
        self.interval
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn mainline(&self) -> &Mainline {
        &self.mainline
    }

    pub fn mainline_key(&self, index: usize) -> Option<&MainlineKey> {
        self.mainline.key(index)
    }

    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }

    pub fn timeline(&self, index: usize) -> Option<&Timeline> {
        self.timelines.get(index)
    }

    /// Index of the first timeline called `name`.
    pub fn timeline_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn timeline_by_name(&self, name: &str) -> Option<&Timeline> {
        self.timeline_index(name).map(|i| &self.timelines[i])
    }
}

fn validate_binding(
    anim: &str,
    key_index: usize,
    what: &str,
    b: &Binding,
    timelines: &[Timeline],
) -> SpriterResult<()> {
    let Some(tl) = timelines.get(b.timeline) else {
        return Err(SpriterError::validation(format!(
            "animation '{anim}' mainline key {key_index}: {what} references missing timeline {}",
            b.timeline
        )));
    };
    if b.key >= tl.keys.len() {
        return Err(SpriterError::validation(format!(
            "animation '{anim}' mainline key {key_index}: {what} references missing key {} of timeline '{}'",
            b.key, tl.info.name
        )));
    }
    Ok(())
}

fn validate_mainline(
    anim: &str,
    mainline: &Mainline,
    timelines: &[Timeline],
    length: i64,
) -> SpriterResult<()> {
    if mainline.is_empty() {
        return Err(SpriterError::validation(format!(
            "animation '{anim}' has an empty mainline"
        )));
    }

    let mut prev_time = i64::MIN;
    for (k, key) in mainline.keys.iter().enumerate() {
        if key.time < 0 || key.time > length {
            return Err(SpriterError::validation(format!(
                "animation '{anim}' mainline key {k} time {} is outside 0..={length}",
                key.time
            )));
        }
        if key.time < prev_time {
            return Err(SpriterError::validation(format!(
                "animation '{anim}' mainline keys are not time-ordered at key {k}"
            )));
        }
        prev_time = key.time;

        for (i, b) in key.bones.iter().enumerate() {
            validate_binding(anim, k, "bone", b, timelines)?;
            if let Some(p) = b.parent
                && p >= i
            {
                return Err(SpriterError::validation(format!(
                    "animation '{anim}' mainline key {k}: bone {i} has parent {p}, parents must precede children"
                )));
            }
        }
        for (i, b) in key.objects.iter().enumerate() {
            validate_binding(anim, k, "object", b, timelines)?;
            if let Some(p) = b.parent
                && p >= key.bones.len()
            {
                return Err(SpriterError::validation(format!(
                    "animation '{anim}' mainline key {k}: object {i} has parent {p} but only {} bones",
                    key.bones.len()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/rig/animation.rs"]
mod tests;
