use crate::animation::curve::Curve;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Reference from a mainline key to one timeline key.
pub struct Binding {
    /// Timeline index inside the animation.
    pub timeline: usize,
    /// Key index inside that timeline.
    pub key: usize,
    /// Index into the same mainline key's `bones` list.
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub z_index: i32,
}

impl Binding {
    pub fn new(timeline: usize, key: usize) -> Self {
        Self {
            timeline,
            key,
            parent: None,
            z_index: 0,
        }
    }

    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Topology snapshot: which parts are active and how they parent each other.
pub struct MainlineKey {
    pub time: i64,
    /// Warps part segments that this key subdivides.
    #[serde(default)]
    pub curve: Curve,
    #[serde(default)]
    pub bones: Vec<Binding>,
    /// Drawable and auxiliary parts, in draw order.
    #[serde(default)]
    pub objects: Vec<Binding>,
}

impl MainlineKey {
    pub fn new(time: i64) -> Self {
        Self {
            time,
            curve: Curve::LINEAR,
            bones: Vec::new(),
            objects: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Time-ordered topology keys of one animation.
pub struct Mainline {
    pub keys: Vec<MainlineKey>,
}

impl Mainline {
    /// Index of the last key at or before `time`, or `0` when `time` precedes every key.
    pub fn active_key_at(&self, time: i64) -> usize {
        self.keys
            .partition_point(|k| k.time <= time)
            .saturating_sub(1)
    }

    pub fn key(&self, index: usize) -> Option<&MainlineKey> {
        self.keys.get(index)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/mainline.rs"]
mod tests;
