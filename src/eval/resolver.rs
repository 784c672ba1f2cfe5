use crate::animation::curve::RootCache;
use crate::foundation::error::{SpriterError, SpriterResult};
use crate::foundation::math::sanitize_fraction;
use crate::rig::animation::Animation;
use crate::rig::mainline::{Binding, MainlineKey};
use crate::rig::pose::Pose;
use crate::transform::hierarchy::to_world;

#[derive(Clone, Debug, Default, PartialEq)]
/// Local poses, world poses and activity flags indexed by timeline.
pub struct PoseBuffer {
    local: Vec<Pose>,
    world: Vec<Pose>,
    active: Vec<bool>,
}

impl PoseBuffer {
    pub fn with_capacity(timelines: usize) -> Self {
        Self {
            local: vec![Pose::default(); timelines],
            world: vec![Pose::default(); timelines],
            active: vec![false; timelines],
        }
    }

    /// Number of timelines this buffer can hold.
    pub fn capacity(&self) -> usize {
        self.local.len()
    }

    pub fn local(&self) -> &[Pose] {
        &self.local
    }

    pub fn world(&self) -> &[Pose] {
        &self.world
    }

    pub fn active(&self) -> &[bool] {
        &self.active
    }

    pub(crate) fn local_mut(&mut self) -> &mut [Pose] {
        &mut self.local
    }

    pub(crate) fn world_mut(&mut self) -> &mut [Pose] {
        &mut self.world
    }

    /// Copy everything from `other` in place; capacities must match.
    pub fn copy_from(&mut self, other: &Self) {
        self.local.copy_from_slice(&other.local);
        self.world.copy_from_slice(&other.world);
        self.active.copy_from_slice(&other.active);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Scratch state rewritten on every resolution.
///
/// Sized once for the widest animation a player can run; resolution never grows it.
pub struct Workspace {
    poses: PoseBuffer,
    /// Root caches of the mainline-key warp, one per timeline.
    warp: Vec<RootCache>,
    /// Root caches of keyframe blends, one per timeline.
    blend: Vec<RootCache>,
}

impl Workspace {
    pub fn with_capacity(timelines: usize) -> Self {
        Self {
            poses: PoseBuffer::with_capacity(timelines),
            warp: vec![RootCache::default(); timelines],
            blend: vec![RootCache::default(); timelines],
        }
    }

    pub fn capacity(&self) -> usize {
        self.poses.capacity()
    }

    /// Poses written by the last [`resolve`].
    pub fn poses(&self) -> &PoseBuffer {
        &self.poses
    }

    /// Forget cached Bezier roots, e.g. after switching animations.
    pub fn reset_root_caches(&mut self) {
        self.warp.iter_mut().for_each(RootCache::clear);
        self.blend.iter_mut().for_each(RootCache::clear);
    }
}

/// Resolve every part bound by the mainline key active at `time`.
///
/// Bones resolve before objects so parents are always ready. Returns the active mainline key
/// index, or a precondition error when `ws` holds fewer timelines than `anim`.
#[tracing::instrument(level = "trace", skip(anim, root, ws), fields(anim = anim.name()))]
pub fn resolve(
    anim: &Animation,
    time: i64,
    root: &Pose,
    ws: &mut Workspace,
) -> SpriterResult<usize> {
    if ws.capacity() < anim.timelines().len() {
        return Err(SpriterError::precondition(format!(
            "workspace holds {} timelines, animation '{}' needs {}",
            ws.capacity(),
            anim.name(),
            anim.timelines().len()
        )));
    }
    Ok(resolve_unchecked(anim, time, root, ws))
}

/// [`resolve`] for callers that already sized `ws` for `anim`.
pub(crate) fn resolve_unchecked(
    anim: &Animation,
    time: i64,
    root: &Pose,
    ws: &mut Workspace,
) -> usize {
    let index = anim.mainline().active_key_at(time);
    let key = &anim.mainline().keys[index];
    ws.poses.active.fill(false);

    for b in key.bones.iter().chain(&key.objects) {
        resolve_binding(anim, key, b, time, root, ws);
    }
    index
}

/// Local pose of `b` at `time`, before parenting.
fn sample_local(
    anim: &Animation,
    mainline_key: &MainlineKey,
    b: &Binding,
    time: i64,
    warp: &mut RootCache,
    blend: &mut RootCache,
) -> Pose {
    let timeline = &anim.timelines()[b.timeline];
    let key = &timeline.keys[b.key];
    let mut next = timeline.next_key(b.key);
    let length = anim.length();

    let mut time = time;
    let mut next_time = next.time;
    if time < key.time {
        time += length;
        next_time += length;
    }
    if next_time < key.time {
        if anim.looping() {
            next_time += length;
        } else {
            next = key;
            next_time = key.time;
        }
    }

    let span = (next_time - key.time) as f64;
    let t = sanitize_fraction((time - key.time) as f64 / span);
    let t = if mainline_key.time > key.time {
        let t_mid = (mainline_key.time - key.time) as f64 / span;
        let t_mid = if t_mid.is_finite() { t_mid } else { 0.0 };
        let t_sub = sanitize_fraction(
            (time - mainline_key.time) as f64 / (next_time - mainline_key.time) as f64,
        );
        mainline_key.curve.interpolate(t_mid, 1.0, t_sub, warp)
    } else {
        mainline_key.curve.interpolate(0.0, 1.0, t, warp)
    };

    let (a, z) = (&key.pose, &next.pose);
    let curve = &key.curve;
    Pose {
        angle: curve.interpolate_angle_with_spin(a.angle, z.angle, t, key.spin, blend),
        position: curve.interpolate_point(a.position, z.position, t, blend),
        scale: curve.interpolate_point(a.scale, z.scale, t, blend),
        pivot: curve.interpolate_point(a.pivot, z.pivot, t, blend),
        alpha: curve.interpolate(a.alpha, z.alpha, t, blend),
        asset: a.asset,
        kind: a.kind,
    }
}

fn resolve_binding(
    anim: &Animation,
    mainline_key: &MainlineKey,
    b: &Binding,
    time: i64,
    root: &Pose,
    ws: &mut Workspace,
) {
    let id = b.timeline;
    let local = sample_local(
        anim,
        mainline_key,
        b,
        time,
        &mut ws.warp[id],
        &mut ws.blend[id],
    );
    let poses = &mut ws.poses;
    let parent = match b.parent {
        Some(p) => poses.world[mainline_key.bones[p].timeline],
        None => *root,
    };
    poses.local[id] = local;
    poses.world[id] = to_world(&local, &parent);
    poses.active[id] = true;
}

/// Recompute world poses of every binding parented, directly or not, to `bone` in `key`.
///
/// Local poses are taken from `poses` as they stand.
pub(crate) fn propagate_descendants(key: &MainlineKey, bone: usize, poses: &mut PoseBuffer) {
    let mut dirty = vec![false; key.bones.len()];
    dirty[bone] = true;
    for (i, b) in key.bones.iter().enumerate().skip(bone + 1) {
        if let Some(p) = b.parent
            && dirty[p]
        {
            dirty[i] = true;
            let parent = poses.world[key.bones[p].timeline];
            poses.world[b.timeline] = to_world(&poses.local[b.timeline], &parent);
        }
    }
    for b in &key.objects {
        if let Some(p) = b.parent
            && dirty[p]
        {
            let parent = poses.world[key.bones[p].timeline];
            poses.world[b.timeline] = to_world(&poses.local[b.timeline], &parent);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/resolver.rs"]
mod tests;
