use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::{AssetFile, AssetFolder, AssetRef};
use crate::foundation::error::{SpriterError, SpriterResult};
use crate::rig::animation::{Animation, AnimationDef, AnimationId};
use crate::rig::timeline::PartInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One substitution of a character map.
pub struct CharacterMapEntry {
    pub from: AssetRef,
    /// Replacement asset; `None` hides parts showing `from`.
    #[serde(default)]
    pub to: Option<AssetRef>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CharacterMapDef {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<CharacterMapEntry>,
}

#[derive(Clone, Debug, PartialEq)]
/// Named asset substitution table applied at draw time.
pub struct CharacterMap {
    pub name: String,
    pub map: BTreeMap<AssetRef, Option<AssetRef>>,
}

impl CharacterMap {
    /// Replacement for `asset`: `Some(None)` hides it, `None` leaves it to other maps.
    pub fn lookup(&self, asset: AssetRef) -> Option<Option<AssetRef>> {
        self.map.get(&asset).copied()
    }
}

impl From<CharacterMapDef> for CharacterMap {
    fn from(def: CharacterMapDef) -> Self {
        Self {
            name: def.name,
            map: def.entries.into_iter().map(|e| (e.from, e.to)).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// JSON-facing entity document.
pub struct EntityDef {
    pub name: String,
    #[serde(default)]
    pub parts: Vec<PartInfo>,
    #[serde(default)]
    pub character_maps: Vec<CharacterMapDef>,
    pub animations: Vec<AnimationDef>,
}

#[derive(Debug)]
/// A character: its animations, part metadata and character maps.
pub struct Entity {
    id: usize,
    name: String,
    parts: Vec<PartInfo>,
    character_maps: Vec<CharacterMap>,
    animations: Vec<Arc<Animation>>,
    animation_by_name: BTreeMap<String, usize>,
    max_timelines: usize,
}

impl Entity {
    pub fn from_def(id: usize, def: EntityDef) -> SpriterResult<Self> {
        if def.animations.is_empty() {
            return Err(SpriterError::validation(format!(
                "entity '{}' has no animations",
                def.name
            )));
        }

        let mut animations = Vec::with_capacity(def.animations.len());
        let mut animation_by_name = BTreeMap::new();
        for (i, anim) in def.animations.into_iter().enumerate() {
            let anim = Animation::from_def(AnimationId(i), anim)?;
            animation_by_name.entry(anim.name().to_owned()).or_insert(i);
            animations.push(Arc::new(anim));
        }
        let max_timelines = animations
            .iter()
            .map(|a| a.timelines().len())
            .max()
            .unwrap_or(0);

        let mut character_maps: Vec<CharacterMap> = Vec::with_capacity(def.character_maps.len());
        for map in def.character_maps {
            if character_maps.iter().any(|m| m.name == map.name) {
                return Err(SpriterError::validation(format!(
                    "entity '{}' has duplicate character map '{}'",
                    def.name, map.name
                )));
            }
            character_maps.push(map.into());
        }

        Ok(Self {
            id,
            name: def.name,
            parts: def.parts,
            character_maps,
            animations,
            animation_by_name,
            max_timelines,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Largest timeline count of any animation; sizes player scratch buffers.
    pub fn max_timelines(&self) -> usize {
        self.max_timelines
    }

    pub fn animations(&self) -> &[Arc<Animation>] {
        &self.animations
    }

    pub fn animation(&self, index: usize) -> Option<&Arc<Animation>> {
        self.animations.get(index)
    }

    pub fn animation_by_name(&self, name: &str) -> Option<&Arc<Animation>> {
        self.animation_by_name
            .get(name)
            .map(|&i| &self.animations[i])
    }

    /// Whether `anim` is one of this entity's own animations.
    pub fn owns(&self, anim: &Arc<Animation>) -> bool {
        self.animations
            .get(anim.id().0)
            .is_some_and(|own| Arc::ptr_eq(own, anim))
    }

    pub fn parts(&self) -> &[PartInfo] {
        &self.parts
    }

    pub fn part_info(&self, name: &str) -> Option<&PartInfo> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn character_maps(&self) -> &[CharacterMap] {
        &self.character_maps
    }

    pub fn character_map(&self, name: &str) -> Option<&CharacterMap> {
        self.character_maps.iter().find(|m| m.name == name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// JSON-facing rig document.
pub struct RigDef {
    #[serde(default)]
    pub folders: Vec<AssetFolder>,
    pub entities: Vec<EntityDef>,
}

#[derive(Debug)]
/// Loaded rig: asset table plus validated entities.
pub struct Rig {
    folders: Vec<AssetFolder>,
    entities: Vec<Arc<Entity>>,
}

impl Rig {
    pub fn from_def(def: RigDef) -> SpriterResult<Self> {
        if def.entities.is_empty() {
            return Err(SpriterError::validation("rig has no entities"));
        }
        let entities = def
            .entities
            .into_iter()
            .enumerate()
            .map(|(i, e)| Entity::from_def(i, e).map(Arc::new))
            .collect::<SpriterResult<Vec<_>>>()?;
        Ok(Self {
            folders: def.folders,
            entities,
        })
    }

    #[tracing::instrument(skip(r))]
    /// Parse and validate a rig from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SpriterResult<Self> {
        let def: RigDef = serde_json::from_reader(r)
            .map_err(|e| SpriterError::serde(format!("parse rig JSON: {e}")))?;
        let rig = Self::from_def(def)?;
        tracing::debug!(entities = rig.entities.len(), "rig loaded");
        Ok(rig)
    }

    #[tracing::instrument(skip_all)]
    /// Parse and validate a rig from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SpriterResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SpriterError::validation(format!("open rig JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn entities(&self) -> &[Arc<Entity>] {
        &self.entities
    }

    pub fn entity(&self, index: usize) -> Option<&Arc<Entity>> {
        self.entities.get(index)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Arc<Entity>> {
        self.entities.iter().find(|e| e.name() == name)
    }

    pub fn folders(&self) -> &[AssetFolder] {
        &self.folders
    }

    /// File metadata for `asset`, if the rig lists it.
    pub fn file(&self, asset: AssetRef) -> Option<&AssetFile> {
        self.folders
            .get(asset.folder as usize)?
            .files
            .get(asset.file as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/entity.rs"]
mod tests;
