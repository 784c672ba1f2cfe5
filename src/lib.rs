//! Spriter-core is a runtime for 2D skeletal/keyframe animation rigs.
//!
//! Given a rig (bones, object slots and named animations built from sparse keyframes) it
//! computes, for any point in time, the world-space pose of every part, ready to be drawn.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `RigDef` (JSON or [`rig::dsl`] builders) `-> Rig`, validated once.
//! 2. **Resolve**: `Animation + time -> PoseBuffer` (local and world poses per timeline).
//! 3. **Play**: [`Player`] owns the time cursor, root transform, character maps and listeners,
//!    and exposes the resolved poses through a pull interface.
//!
//! Rendering and texture loading stay outside the crate: renderers read
//! [`Player::drawables`] and [`Player::asset_for`] and draw however they like.
//!
//! # Design constraints
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Immutable rig data**: animations are shared through `Arc`; every player owns its own
//!   scratch buffers, sized once per entity.
//! - **Playback never fails**: [`Player::update`] sanitizes degenerate input instead of erroring.
#![forbid(unsafe_code)]

mod animation;
mod eval;
mod foundation;
mod player;

/// Rig data model and builders.
pub mod rig;
/// Shared transform helpers (linear, affine, hierarchy propagation).
pub mod transform;

pub use animation::curve::{Curve, CurveKind, RootCache};
pub use eval::resolver::{PoseBuffer, Workspace, resolve};
pub use foundation::core::{
    Affine, AssetFile, AssetFolder, AssetIndex, AssetRef, FILE_INDEX_BITS, Point, Vec2,
};
pub use foundation::error::{SpriterError, SpriterResult};
pub use foundation::math::{
    bezier, de_casteljau, lerp, lerp_angle, sanitize_fraction, shortest_arc, solve_cubic,
    solve_quadratic,
};
pub use player::listener::PlayerListener;
pub use player::opts::PlayerOpts;
pub use player::playback::Player;
pub use rig::animation::{Animation, AnimationDef, AnimationId};
pub use rig::dsl::{
    AnimationBuilder, EntityBuilder, MainlineKeyBuilder, RigBuilder, TimelineBuilder,
};
pub use rig::entity::{
    CharacterMap, CharacterMapDef, CharacterMapEntry, Entity, EntityDef, Rig, RigDef,
};
pub use rig::mainline::{Binding, Mainline, MainlineKey};
pub use rig::pose::{PartKind, Pose, Spin};
pub use rig::timeline::{Keyframe, PartInfo, Timeline};
