use std::sync::Arc;

use crate::eval::resolver::{
    PoseBuffer, Workspace, propagate_descendants, resolve_unchecked,
};
use crate::foundation::core::{AssetIndex, AssetRef, Vec2};
use crate::foundation::error::{SpriterError, SpriterResult};
use crate::player::listener::PlayerListener;
use crate::player::opts::PlayerOpts;
use crate::rig::animation::Animation;
use crate::rig::entity::{CharacterMap, Entity};
use crate::rig::mainline::{Binding, MainlineKey};
use crate::rig::pose::Pose;
use crate::rig::timeline::PartInfo;
use crate::transform::hierarchy::{to_local, to_world};
use crate::transform::linear::rotate;

/// Log a rejected call and build the matching error.
fn rejected(msg: String) -> SpriterError {
    tracing::warn!("{msg}");
    SpriterError::precondition(msg)
}

/// Plays the animations of one entity.
///
/// Each update resolves the active mainline key into a private workspace, then publishes the
/// poses by copying them into the back buffer and swapping it to the front. Queries always read
/// the front buffer.
pub struct Player {
    entity: Arc<Entity>,
    animation: Arc<Animation>,
    /// Milliseconds into `animation`.
    time: i64,
    key: usize,
    previous_key: Option<(Arc<Animation>, usize)>,

    root: Pose,
    position: Vec2,
    pivot: Vec2,
    angle: f64,
    root_dirty: bool,

    /// Indices into `entity.character_maps()`, in enable order.
    character_maps: Vec<usize>,
    listeners: Vec<Box<dyn PlayerListener>>,

    scratch: Workspace,
    front: PoseBuffer,
    back: PoseBuffer,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("entity", &self.entity.name())
            .field("animation", &self.animation.name())
            .field("time", &self.time)
            .field("key", &self.key)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Player {
    /// Player on the entity's first animation, already resolved at time 0.
    pub fn new(entity: Arc<Entity>) -> Self {
        let capacity = entity.max_timelines();
        let animation = Arc::clone(&entity.animations()[0]);
        let mut player = Self {
            entity,
            animation,
            time: 0,
            key: 0,
            previous_key: None,
            root: Pose::bone(),
            position: Vec2::ZERO,
            pivot: Vec2::ZERO,
            angle: 0.0,
            root_dirty: false,
            character_maps: Vec::new(),
            listeners: Vec::new(),
            scratch: Workspace::with_capacity(capacity),
            front: PoseBuffer::with_capacity(capacity),
            back: PoseBuffer::with_capacity(capacity),
        };
        player.update(0);
        player
    }

    /// Build a player and apply `opts`.
    pub fn with_opts(entity: Arc<Entity>, opts: &PlayerOpts) -> SpriterResult<Self> {
        let mut player = Self::new(entity);
        if let Some(name) = &opts.animation {
            player.set_animation_by_name(name)?;
        }
        for name in &opts.character_maps {
            player.enable_character_map(name)?;
        }
        player.set_position(opts.position.x, opts.position.y);
        player.set_pivot(opts.pivot.x, opts.pivot.y);
        player.set_angle(opts.angle);
        player.set_scale(opts.scale);
        if opts.flip_x {
            player.flip_x();
        }
        if opts.flip_y {
            player.flip_y();
        }
        player.set_time(opts.time);
        player.update(0);
        Ok(player)
    }

    pub fn add_listener(&mut self, listener: impl PlayerListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Resolve poses at the current time, publish them, then advance by `delta_ms`.
    pub fn update(&mut self, delta_ms: i64) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for l in listeners.iter_mut() {
            l.before_update(self);
        }

        if self.root_dirty {
            self.update_root();
        }

        let key = resolve_unchecked(&self.animation, self.time, &self.root, &mut self.scratch);
        self.key = key;
        let changed = self
            .previous_key
            .as_ref()
            .is_none_or(|(anim, k)| !Arc::ptr_eq(anim, &self.animation) || *k != key);
        if changed {
            let prev = self
                .previous_key
                .as_ref()
                .and_then(|(anim, k)| anim.mainline_key(*k));
            let new = &self.animation.mainline().keys[key];
            for l in listeners.iter_mut() {
                l.mainline_key_changed(prev, new);
            }
            self.previous_key = Some((Arc::clone(&self.animation), key));
        }

        self.back.copy_from(self.scratch.poses());
        std::mem::swap(&mut self.front, &mut self.back);

        for l in listeners.iter_mut() {
            l.after_update(self);
        }
        self.advance(delta_ms, &mut listeners);
        self.listeners = listeners;
        tracing::trace!(time = self.time, key, "player updated");
    }

    /// Add `delta_ms` with at most one wrap in either direction.
    fn advance(&mut self, delta_ms: i64, listeners: &mut [Box<dyn PlayerListener>]) {
        let length = self.animation.length();
        self.time = self.time.saturating_add(delta_ms);
        let wrapped = if self.time >= length {
            self.time -= length;
            true
        } else if self.time < 0 {
            self.time += length;
            true
        } else {
            false
        };
        if wrapped {
            tracing::debug!(animation = self.animation.name(), "animation wrapped");
            for l in listeners.iter_mut() {
                l.animation_finished(&self.animation);
            }
        }
    }

    fn update_root(&mut self) {
        self.root.angle = self.angle;
        self.root.position = rotate(self.pivot, self.angle) + self.position;
        self.root_dirty = false;
    }

    /// Switch to `animation`, restart it at time 0 and resolve it immediately.
    ///
    /// Animations of other entities are rejected; detached animations are accepted when they fit
    /// the player's scratch buffers. Switching to the current animation does nothing.
    pub fn set_animation(&mut self, animation: Arc<Animation>) -> SpriterResult<()> {
        if Arc::ptr_eq(&animation, &self.animation) {
            return Ok(());
        }
        if !animation.id().is_detached() && !self.entity.owns(&animation) {
            return Err(rejected(format!(
                "animation '{}' does not belong to entity '{}'",
                animation.name(),
                self.entity.name()
            )));
        }
        if animation.timelines().len() > self.scratch.capacity() {
            return Err(rejected(format!(
                "animation '{}' has {} timelines, player holds {}",
                animation.name(),
                animation.timelines().len(),
                self.scratch.capacity()
            )));
        }

        tracing::debug!(
            from = self.animation.name(),
            to = animation.name(),
            "switching animation"
        );
        let old = std::mem::replace(&mut self.animation, animation);
        self.scratch.reset_root_caches();
        self.time = 0;
        self.update(0);
        self.time = 0;

        let mut listeners = std::mem::take(&mut self.listeners);
        for l in listeners.iter_mut() {
            l.animation_changed(&old, &self.animation);
        }
        self.listeners = listeners;
        Ok(())
    }

    pub fn set_animation_by_name(&mut self, name: &str) -> SpriterResult<()> {
        let Some(anim) = self.entity.animation_by_name(name).cloned() else {
            return Err(rejected(format!(
                "entity '{}' has no animation '{name}'",
                self.entity.name()
            )));
        };
        self.set_animation(anim)
    }

    pub fn set_animation_by_index(&mut self, index: usize) -> SpriterResult<()> {
        let Some(anim) = self.entity.animation(index).cloned() else {
            return Err(rejected(format!(
                "entity '{}' has no animation #{index}",
                self.entity.name()
            )));
        };
        self.set_animation(anim)
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    pub fn animation(&self) -> &Arc<Animation> {
        &self.animation
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    /// Jump to `time`, wrapping once like [`Player::update`] does.
    pub fn set_time(&mut self, time: i64) {
        self.time = time;
        let mut listeners = std::mem::take(&mut self.listeners);
        self.advance(0, &mut listeners);
        self.listeners = listeners;
    }

    /// Index of the mainline key resolved by the last update.
    pub fn current_key_index(&self) -> usize {
        self.key
    }

    pub fn current_key(&self) -> &MainlineKey {
        &self.animation.mainline().keys[self.key]
    }

    // Root transform.

    /// Composite root pose parts are parented to.
    pub fn root(&self) -> &Pose {
        &self.root
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Vec2::new(x, y);
        self.root_dirty = true;
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// Point the root rotates around, relative to the position.
    pub fn set_pivot(&mut self, x: f64, y: f64) {
        self.pivot = Vec2::new(x, y);
        self.root_dirty = true;
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
        self.root_dirty = true;
    }

    /// Uniform root scale; current flips are kept.
    pub fn set_scale(&mut self, scale: f64) {
        let sx = if self.flipped_x() { -scale } else { scale };
        let sy = if self.flipped_y() { -scale } else { scale };
        self.root.scale = Vec2::new(sx, sy);
    }

    pub fn flip_x(&mut self) {
        self.root.scale.x = -self.root.scale.x;
    }

    pub fn flip_y(&mut self) {
        self.root.scale.y = -self.root.scale.y;
    }

    pub fn flipped_x(&self) -> bool {
        self.root.scale.x < 0.0
    }

    pub fn flipped_y(&self) -> bool {
        self.root.scale.y < 0.0
    }

    // Character maps.

    /// Enable the named character map after the ones already enabled.
    pub fn enable_character_map(&mut self, name: &str) -> SpriterResult<()> {
        let Some(index) = self.map_index(name) else {
            return Err(rejected(format!(
                "entity '{}' has no character map '{name}'",
                self.entity.name()
            )));
        };
        if !self.character_maps.contains(&index) {
            self.character_maps.push(index);
        }
        Ok(())
    }

    pub fn disable_character_map(&mut self, name: &str) -> SpriterResult<()> {
        let Some(index) = self.map_index(name) else {
            return Err(rejected(format!(
                "entity '{}' has no character map '{name}'",
                self.entity.name()
            )));
        };
        self.character_maps.retain(|&i| i != index);
        Ok(())
    }

    pub fn enabled_character_maps(&self) -> impl Iterator<Item = &CharacterMap> {
        let maps = self.entity.character_maps();
        self.character_maps.iter().map(move |&i| &maps[i])
    }

    fn map_index(&self, name: &str) -> Option<usize> {
        self.entity
            .character_maps()
            .iter()
            .position(|m| m.name == name)
    }

    /// Asset to draw for `pose` after character maps; `None` when hidden or asset-less.
    ///
    /// The first enabled map with an entry for the pose's asset decides.
    pub fn asset_for(&self, pose: &Pose) -> Option<AssetRef> {
        let asset = pose.asset?;
        self.enabled_character_maps()
            .find_map(|m| m.lookup(asset))
            .unwrap_or(Some(asset))
    }

    /// Packed form of [`Player::asset_for`].
    pub fn asset_index_for(&self, pose: &Pose) -> Option<AssetIndex> {
        self.asset_for(pose).map(AssetRef::index)
    }

    // Queries.

    fn binding_pose(&self, binding: Option<&Binding>) -> Option<&Pose> {
        binding.map(|b| &self.front.world()[b.timeline])
    }

    /// World pose of the `index`-th bone of the current key.
    pub fn bone(&self, index: usize) -> Option<&Pose> {
        self.binding_pose(self.current_key().bones.get(index))
    }

    /// World pose of the `index`-th object of the current key.
    pub fn object(&self, index: usize) -> Option<&Pose> {
        self.binding_pose(self.current_key().objects.get(index))
    }

    fn timeline_named(&self, b: &Binding, name: &str) -> bool {
        self.animation
            .timeline(b.timeline)
            .is_some_and(|t| t.name() == name)
    }

    /// Position of the bone called `name` in the current key.
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.current_key()
            .bones
            .iter()
            .position(|b| self.timeline_named(b, name))
    }

    pub fn object_index(&self, name: &str) -> Option<usize> {
        self.current_key()
            .objects
            .iter()
            .position(|b| self.timeline_named(b, name))
    }

    /// World pose of the active part whose timeline is called `name`.
    pub fn bone_by_name(&self, name: &str) -> Option<&Pose> {
        self.world_pose(self.animation.timeline_index(name)?)
    }

    pub fn object_by_name(&self, name: &str) -> Option<&Pose> {
        self.bone_by_name(name)
    }

    pub fn part_info(&self, timeline: usize) -> Option<&PartInfo> {
        self.animation.timeline(timeline).map(|t| &t.info)
    }

    pub fn is_active(&self, timeline: usize) -> bool {
        timeline < self.animation.timelines().len()
            && self.front.active().get(timeline).copied().unwrap_or(false)
    }

    /// Local pose of an active timeline.
    pub fn local_pose(&self, timeline: usize) -> Option<&Pose> {
        self.is_active(timeline)
            .then(|| &self.front.local()[timeline])
    }

    /// World pose of an active timeline.
    pub fn world_pose(&self, timeline: usize) -> Option<&Pose> {
        self.is_active(timeline)
            .then(|| &self.front.world()[timeline])
    }

    /// Number of objects the current key draws.
    pub fn drawable_count(&self) -> usize {
        self.current_key().objects.len()
    }

    pub fn drawable(&self, index: usize) -> Option<&Pose> {
        self.object(index)
    }

    /// Object world poses in draw order.
    pub fn drawables(&self) -> impl Iterator<Item = &Pose> {
        let world = self.front.world();
        self.current_key()
            .objects
            .iter()
            .map(move |b| &world[b.timeline])
    }

    /// Place an active part at `world` until the next update and carry its descendants along.
    pub fn override_world_pose(&mut self, timeline: usize, world: Pose) -> SpriterResult<()> {
        let animation = Arc::clone(&self.animation);
        let key = &animation.mainline().keys[self.key];
        let bone = key.bones.iter().position(|b| b.timeline == timeline);
        let binding = match bone {
            Some(i) => &key.bones[i],
            None => match key.objects.iter().find(|b| b.timeline == timeline) {
                Some(b) => b,
                None => {
                    return Err(rejected(format!(
                        "timeline {timeline} is not bound by the current mainline key"
                    )));
                }
            },
        };

        let parent = match binding.parent {
            Some(p) => self.front.world()[key.bones[p].timeline],
            None => self.root,
        };
        let local = to_local(&world, &parent);
        self.front.local_mut()[timeline] = local;
        self.front.world_mut()[timeline] = to_world(&local, &parent);
        if let Some(i) = bone {
            propagate_descendants(key, i, &mut self.front);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/playback.rs"]
mod tests;
