use super::*;
use crate::rig::dsl::{AnimationBuilder, EntityBuilder, MainlineKeyBuilder, TimelineBuilder};
use crate::rig::pose::PartKind;
use std::cell::RefCell;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn walk() -> AnimationBuilder {
    AnimationBuilder::new("walk", 1000)
        .timeline(
            TimelineBuilder::new("root", PartKind::Bone)
                .key(0, Pose::bone())
                .key(500, Pose::bone().with_position(0.0, 20.0))
                .build(),
        )
        .timeline(
            TimelineBuilder::new("arm", PartKind::Bone)
                .key(0, Pose::bone().with_position(10.0, 0.0))
                .build(),
        )
        .timeline(
            TimelineBuilder::new("hand", PartKind::Sprite)
                .key(0, Pose::sprite(AssetRef::new(0, 2)).with_position(5.0, 0.0))
                .build(),
        )
        .mainline_key(
            MainlineKeyBuilder::new(0)
                .bone(Binding::new(0, 0))
                .bone(Binding::new(1, 0).with_parent(0))
                .object(Binding::new(2, 0).with_parent(1))
                .build(),
        )
        .mainline_key(
            MainlineKeyBuilder::new(500)
                .bone(Binding::new(0, 1))
                .bone(Binding::new(1, 0).with_parent(0))
                .object(Binding::new(2, 0).with_parent(1))
                .build(),
        )
}

fn idle() -> AnimationBuilder {
    AnimationBuilder::new("idle", 400)
        .timeline(
            TimelineBuilder::new("root", PartKind::Bone)
                .key(0, Pose::bone())
                .build(),
        )
        .mainline_key(MainlineKeyBuilder::new(0).bone(Binding::new(0, 0)).build())
}

fn entity() -> Arc<Entity> {
    EntityBuilder::new("hero")
        .animation(walk().build_def())
        .animation(idle().build_def())
        .character_map("armor", [(AssetRef::new(0, 2), Some(AssetRef::new(0, 5)))])
        .character_map("alt", [(AssetRef::new(0, 2), Some(AssetRef::new(0, 7)))])
        .character_map("ghost", [(AssetRef::new(0, 2), None)])
        .build()
        .unwrap()
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<String>>>);

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl PlayerListener for Recorder {
    fn before_update(&mut self, player: &Player) {
        self.0.borrow_mut().push(format!("before {}", player.time()));
    }

    fn after_update(&mut self, player: &Player) {
        self.0.borrow_mut().push(format!("after {}", player.time()));
    }

    fn mainline_key_changed(&mut self, prev: Option<&MainlineKey>, new: &MainlineKey) {
        self.0
            .borrow_mut()
            .push(format!("key {:?} -> {}", prev.map(|k| k.time), new.time));
    }

    fn animation_finished(&mut self, animation: &Animation) {
        self.0.borrow_mut().push(format!("finished {}", animation.name()));
    }

    fn animation_changed(&mut self, old: &Animation, new: &Animation) {
        self.0
            .borrow_mut()
            .push(format!("changed {} -> {}", old.name(), new.name()));
    }
}

#[test]
fn new_player_is_resolved_at_time_zero() {
    let p = Player::new(entity());
    assert_eq!(p.animation().name(), "walk");
    assert_eq!(p.time(), 0);
    let hand = p.drawable(0).unwrap();
    assert!(close(hand.position.x, 15.0));
    assert_eq!(p.drawable_count(), 1);
}

#[test]
fn update_notifies_in_order() {
    let mut p = Player::new(entity());
    let rec = Recorder::default();
    p.add_listener(rec.clone());

    p.update(500);
    assert_eq!(rec.events(), vec!["before 0", "after 0"]);
    rec.clear();

    p.update(600);
    assert_eq!(
        rec.events(),
        vec![
            "before 500",
            "key Some(0) -> 500",
            "after 500",
            "finished walk"
        ]
    );
    assert_eq!(p.time(), 100);
}

#[test]
fn full_loop_fires_finished_once_and_returns_to_start() {
    let mut p = Player::new(entity());
    let start = *p.bone(0).unwrap();
    let rec = Recorder::default();
    p.add_listener(rec.clone());

    for _ in 0..4 {
        p.update(250);
    }
    assert_eq!(rec.count("finished"), 1);
    assert_eq!(p.time(), 0);
    p.update(0);
    assert_eq!(*p.bone(0).unwrap(), start);
}

#[test]
fn negative_delta_wraps_backward_once() {
    let mut p = Player::new(entity());
    let rec = Recorder::default();
    p.add_listener(rec.clone());
    p.update(-100);
    assert_eq!(p.time(), 900);
    assert_eq!(rec.count("finished"), 1);

    // Oversized deltas still wrap only once.
    p.set_time(0);
    p.update(2500);
    assert_eq!(p.time(), 1500);
}

#[test]
fn extreme_deltas_saturate_instead_of_overflowing() {
    let mut p = Player::new(entity());
    let rec = Recorder::default();
    p.add_listener(rec.clone());

    p.update(1);
    p.update(i64::MAX);
    assert_eq!(p.time(), i64::MAX - 1000);
    assert_eq!(rec.count("finished"), 1);
    p.update(0);
    assert!(p.bone(0).is_some());

    p.set_time(0);
    p.update(i64::MIN);
    assert_eq!(p.time(), i64::MIN + 1000);
    p.update(0);
    assert!(p.bone(0).is_some());
}

#[test]
fn set_time_wraps_like_update() {
    let mut p = Player::new(entity());
    p.set_time(1200);
    assert_eq!(p.time(), 200);
    p.set_time(-50);
    assert_eq!(p.time(), 950);
    p.set_time(300);
    assert_eq!(p.time(), 300);
}

#[test]
fn switching_animation_resets_time_and_notifies() {
    let mut p = Player::new(entity());
    let rec = Recorder::default();
    p.add_listener(rec.clone());
    p.update(300);

    p.set_animation_by_name("idle").unwrap();
    assert_eq!(p.animation().name(), "idle");
    assert_eq!(p.time(), 0);
    assert_eq!(
        rec.events()[2..],
        [
            "before 0".to_owned(),
            "key Some(0) -> 0".to_owned(),
            "after 0".to_owned(),
            "changed walk -> idle".to_owned(),
        ]
    );

    rec.clear();
    p.set_animation_by_index(1).unwrap();
    assert!(rec.events().is_empty());
}

#[test]
fn foreign_animation_is_rejected_without_side_effects() {
    let mut p = Player::new(entity());
    p.update(300);
    let other = entity();
    let foreign = Arc::clone(&other.animations()[1]);
    let err = p.set_animation(foreign).unwrap_err();
    assert!(matches!(err, SpriterError::Precondition(_)));
    assert_eq!(p.animation().name(), "walk");
    assert_eq!(p.time(), 300);

    assert!(p.set_animation_by_name("jump").is_err());
    assert!(p.set_animation_by_index(9).is_err());
    assert_eq!(p.animation().name(), "walk");
}

#[test]
fn detached_animation_is_accepted_when_it_fits() {
    let mut p = Player::new(entity());
    let detached = Arc::new(idle().build_detached().unwrap());
    p.set_animation(Arc::clone(&detached)).unwrap();
    assert!(Arc::ptr_eq(p.animation(), &detached));

    let mut wide = AnimationBuilder::new("wide", 100);
    for i in 0..5 {
        wide = wide.timeline(
            TimelineBuilder::new(format!("t{i}"), PartKind::Bone)
                .key(0, Pose::bone())
                .build(),
        );
    }
    let wide = wide
        .mainline_key(MainlineKeyBuilder::new(0).build())
        .build_detached()
        .unwrap();
    assert!(p.set_animation(Arc::new(wide)).is_err());
}

#[test]
fn root_transform_applies_pivot_angle_and_position() {
    let mut p = Player::new(entity());
    p.set_position(5.0, 0.0);
    p.set_pivot(1.0, 0.0);
    p.set_angle(FRAC_PI_2);
    p.update(0);
    assert!(close(p.root().position.x, 5.0));
    assert!(close(p.root().position.y, 1.0));
    let arm = p.bone(1).unwrap();
    assert!(close(arm.position.x, 5.0));
    assert!(close(arm.position.y, 11.0));
}

#[test]
fn scale_keeps_flips() {
    let mut p = Player::new(entity());
    p.flip_x();
    assert!(p.flipped_x());
    assert!(!p.flipped_y());
    p.set_scale(2.0);
    assert_eq!(p.root().scale, Vec2::new(-2.0, 2.0));
    p.flip_y();
    p.update(0);
    assert!(p.flipped_y());
    let hand = p.drawable(0).unwrap();
    assert!(close(hand.position.x, -30.0));
    assert!(close(hand.position.y, 0.0));
}

#[test]
fn character_maps_first_enabled_wins() {
    let mut p = Player::new(entity());
    let hand = *p.drawable(0).unwrap();
    assert_eq!(p.asset_for(&hand), Some(AssetRef::new(0, 2)));

    p.enable_character_map("alt").unwrap();
    p.enable_character_map("armor").unwrap();
    assert_eq!(p.asset_for(&hand), Some(AssetRef::new(0, 7)));
    assert_eq!(p.asset_index_for(&hand), Some(AssetRef::new(0, 7).index()));

    p.disable_character_map("alt").unwrap();
    assert_eq!(p.asset_for(&hand), Some(AssetRef::new(0, 5)));

    p.enable_character_map("ghost").unwrap();
    assert_eq!(p.asset_for(&hand), Some(AssetRef::new(0, 5)));
    p.disable_character_map("armor").unwrap();
    assert_eq!(p.asset_for(&hand), None);

    assert!(p.enable_character_map("missing").is_err());
    assert_eq!(p.drawable(0).unwrap().asset, Some(AssetRef::new(0, 2)));
}

#[test]
fn lookups_by_name_and_index() {
    let p = Player::new(entity());
    assert_eq!(p.bone_index("arm"), Some(1));
    assert_eq!(p.object_index("hand"), Some(0));
    assert_eq!(p.bone_index("hand"), None);
    assert!(close(p.object_by_name("hand").unwrap().position.x, 15.0));
    assert_eq!(p.part_info(2).map(|i| i.kind), Some(PartKind::Sprite));
    assert!(p.is_active(1));
    assert!(!p.is_active(7));
    assert!(close(p.local_pose(1).unwrap().position.x, 10.0));
    assert_eq!(p.drawables().count(), 1);
}

#[test]
fn override_moves_descendants_until_next_update() {
    let mut p = Player::new(entity());
    let moved = Pose::bone().with_position(100.0, 0.0);
    p.override_world_pose(1, moved).unwrap();
    assert!(close(p.world_pose(1).unwrap().position.x, 100.0));
    assert!(close(p.local_pose(1).unwrap().position.x, 100.0));
    assert!(close(p.drawable(0).unwrap().position.x, 105.0));

    p.update(0);
    assert!(close(p.drawable(0).unwrap().position.x, 15.0));

    assert!(p.override_world_pose(9, moved).is_err());
}

#[test]
fn with_opts_applies_initial_state() {
    let opts = PlayerOpts {
        animation: Some("idle".to_owned()),
        time: 100,
        position: Vec2::new(3.0, 4.0),
        character_maps: vec!["armor".to_owned()],
        flip_x: true,
        ..PlayerOpts::default()
    };
    let p = Player::with_opts(entity(), &opts).unwrap();
    assert_eq!(p.animation().name(), "idle");
    assert_eq!(p.time(), 100);
    assert!(p.flipped_x());
    assert!(close(p.bone(0).unwrap().position.x, 3.0));
    assert_eq!(p.enabled_character_maps().count(), 1);

    let bad = PlayerOpts {
        character_maps: vec!["nope".to_owned()],
        ..PlayerOpts::default()
    };
    assert!(Player::with_opts(entity(), &bad).is_err());
}
