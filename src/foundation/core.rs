pub use kurbo::{Affine, Point, Vec2};

/// Number of bits reserved for the file index when packing an [`AssetRef`].
pub const FILE_INDEX_BITS: u32 = 10;

/// Reference to one image file inside one asset folder.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct AssetRef {
    /// Folder index in the rig's asset table.
    pub folder: u32,
    /// File index inside `folder`.
    pub file: u32,
}

impl AssetRef {
    pub fn new(folder: u32, file: u32) -> Self {
        Self { folder, file }
    }

    /// Packed single-integer form, `folder << 10 | file`.
    pub fn index(self) -> AssetIndex {
        AssetIndex((self.folder << FILE_INDEX_BITS) + self.file)
    }
}

/// Packed asset index as handed to renderers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct AssetIndex(pub u32);

impl AssetIndex {
    pub fn folder(self) -> u32 {
        self.0 >> FILE_INDEX_BITS
    }

    pub fn file(self) -> u32 {
        self.0 & ((1 << FILE_INDEX_BITS) - 1)
    }

    pub fn to_ref(self) -> AssetRef {
        AssetRef::new(self.folder(), self.file())
    }
}

/// Image metadata the loader resolved from the authoring tool's asset table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetFile {
    pub name: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Default pivot in normalized image coordinates.
    #[serde(default = "default_file_pivot")]
    pub pivot: Vec2,
}

fn default_file_pivot() -> Vec2 {
    Vec2::new(0.0, 1.0)
}

/// Ordered list of files sharing one folder index.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetFolder {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub files: Vec<AssetFile>,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
