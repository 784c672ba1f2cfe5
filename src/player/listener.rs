use crate::player::playback::Player;
use crate::rig::animation::Animation;
use crate::rig::mainline::MainlineKey;

/// Observer invoked synchronously from inside [`Player::update`] and
/// [`Player::set_animation`]. Every method defaults to a no-op.
pub trait PlayerListener {
    /// Before any resolution work of an update.
    fn before_update(&mut self, _player: &Player) {}

    /// After fresh poses are visible, before time advances.
    fn after_update(&mut self, _player: &Player) {}

    /// The active mainline key differs from the previous update's. `prev` is `None` on the very
    /// first update.
    fn mainline_key_changed(&mut self, _prev: Option<&MainlineKey>, _new: &MainlineKey) {}

    /// Time wrapped past either end of `animation`.
    fn animation_finished(&mut self, _animation: &Animation) {}

    fn animation_changed(&mut self, _old: &Animation, _new: &Animation) {}
}
