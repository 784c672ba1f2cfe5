use std::sync::Arc;

use crate::animation::curve::Curve;
use crate::foundation::core::{AssetFolder, AssetRef};
use crate::foundation::error::SpriterResult;
use crate::rig::animation::{Animation, AnimationDef};
use crate::rig::entity::{CharacterMapDef, CharacterMapEntry, Entity, EntityDef, Rig, RigDef};
use crate::rig::mainline::{Binding, Mainline, MainlineKey};
use crate::rig::pose::{PartKind, Pose, Spin};
use crate::rig::timeline::{Keyframe, PartInfo, Timeline};

pub struct TimelineBuilder {
    info: PartInfo,
    keys: Vec<Keyframe>,
}

impl TimelineBuilder {
    pub fn new(name: impl Into<String>, kind: PartKind) -> Self {
        Self {
            info: PartInfo::new(name, kind),
            keys: Vec::new(),
        }
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.info.width = width;
        self.info.height = height;
        self
    }

    /// Linear, forward-spinning key.
    pub fn key(self, time: i64, pose: Pose) -> Self {
        self.keyframe(Keyframe::new(time, pose))
    }

    pub fn key_with(self, time: i64, curve: Curve, spin: Spin, pose: Pose) -> Self {
        self.keyframe(Keyframe::new(time, pose).with_curve(curve).with_spin(spin))
    }

    pub fn keyframe(mut self, key: Keyframe) -> Self {
        self.keys.push(key);
        self
    }

    pub fn build(self) -> Timeline {
        Timeline {
            id: 0,
            info: self.info,
            keys: self.keys,
        }
    }
}

pub struct MainlineKeyBuilder {
    key: MainlineKey,
}

impl MainlineKeyBuilder {
    pub fn new(time: i64) -> Self {
        Self {
            key: MainlineKey::new(time),
        }
    }

    pub fn curve(mut self, curve: Curve) -> Self {
        self.key.curve = curve;
        self
    }

    pub fn bone(mut self, binding: Binding) -> Self {
        self.key.bones.push(binding);
        self
    }

    pub fn object(mut self, binding: Binding) -> Self {
        self.key.objects.push(binding);
        self
    }

    pub fn build(self) -> MainlineKey {
        self.key
    }
}

pub struct AnimationBuilder {
    def: AnimationDef,
}

impl AnimationBuilder {
    pub fn new(name: impl Into<String>, length: i64) -> Self {
        Self {
            def: AnimationDef {
                name: name.into(),
                length,
                interval: 0,
                looping: true,
                mainline: Mainline::default(),
                timelines: Vec::new(),
            },
        }
    }

    pub fn interval(mut self, interval: i64) -> Self {
        self.def.interval = interval;
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.def.looping = looping;
        self
    }

    pub fn timeline(mut self, timeline: Timeline) -> Self {
        self.def.timelines.push(timeline);
        self
    }

    pub fn mainline_key(mut self, key: MainlineKey) -> Self {
        self.def.mainline.keys.push(key);
        self
    }

    pub fn build_def(self) -> AnimationDef {
        self.def
    }

    /// Validate into an animation owned by no entity.
    pub fn build_detached(self) -> SpriterResult<Animation> {
        Animation::detached(self.def)
    }
}

pub struct EntityBuilder {
    def: EntityDef,
}

impl EntityBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: EntityDef {
                name: name.into(),
                parts: Vec::new(),
                character_maps: Vec::new(),
                animations: Vec::new(),
            },
        }
    }

    pub fn part(mut self, info: PartInfo) -> Self {
        self.def.parts.push(info);
        self
    }

    pub fn animation(mut self, def: AnimationDef) -> Self {
        self.def.animations.push(def);
        self
    }

    /// Add a re-texture map; `None` targets hide the source asset.
    pub fn character_map(
        mut self,
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (AssetRef, Option<AssetRef>)>,
    ) -> Self {
        self.def.character_maps.push(CharacterMapDef {
            name: name.into(),
            entries: entries
                .into_iter()
                .map(|(from, to)| CharacterMapEntry { from, to })
                .collect(),
        });
        self
    }

    pub fn build_def(self) -> EntityDef {
        self.def
    }

    pub fn build(self) -> SpriterResult<Arc<Entity>> {
        Entity::from_def(0, self.def).map(Arc::new)
    }
}

#[derive(Default)]
pub struct RigBuilder {
    def: RigDef,
}

impl RigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder(mut self, folder: AssetFolder) -> Self {
        self.def.folders.push(folder);
        self
    }

    pub fn entity(mut self, def: EntityDef) -> Self {
        self.def.entities.push(def);
        self
    }

    pub fn build(self) -> SpriterResult<Rig> {
        Rig::from_def(self.def)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/dsl.rs"]
mod tests;
