use std::time::Duration;

use hecs::World;

use crate::components::{LocalTransform, Player};
use crate::engine::input::Keys;
use crate::motion::{CharacterMotion, MotionStep};
use crate::pose::ClipMixer;
use crate::scene::RigScene;
use crate::timed_action::ActionSet;

/// Integrate the player transform for one tick and write it to the root
/// `LocalTransform`. Returns the player's step for the camera.
pub fn character_motion_system(
    world: &mut World,
    keys: &Keys,
    camera_horizontal: f32,
    now: Duration,
) -> Option<MotionStep> {
    let mut player_step = None;
    for (_e, (motion, actions, local, mixer)) in world
        .query_mut::<(
            &mut CharacterMotion,
            &mut ActionSet,
            &mut LocalTransform,
            &mut ClipMixer,
        )>()
        .with::<&Player>()
    {
        let step = motion.advance(keys, actions, camera_horizontal, now);
        step.apply(&mut RigScene::new(local, mixer));
        player_step = Some(step);
    }
    player_step
}
