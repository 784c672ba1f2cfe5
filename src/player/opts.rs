use crate::foundation::core::Vec2;

fn default_scale() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Initial state applied by [`crate::Player::with_opts`].
pub struct PlayerOpts {
    /// Animation to start with; the entity's first animation when unset.
    #[serde(default)]
    pub animation: Option<String>,
    /// Starting time in milliseconds.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub pivot: Vec2,
    /// Root rotation in radians.
    #[serde(default)]
    pub angle: f64,
    /// Uniform root scale.
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    /// Character maps to enable, in order.
    #[serde(default)]
    pub character_maps: Vec<String>,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            animation: None,
            time: 0,
            position: Vec2::ZERO,
            pivot: Vec2::ZERO,
            angle: 0.0,
            scale: default_scale(),
            flip_x: false,
            flip_y: false,
            character_maps: Vec::new(),
        }
    }
}
