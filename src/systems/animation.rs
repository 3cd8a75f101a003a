use std::time::Duration;

use hecs::World;

use crate::animation::AnimationDirector;
use crate::components::{CharacterBody, LocalTransform, Player};
use crate::engine::input::InputState;
use crate::pose::{BonePose, ClipMixer};
use crate::scene::RigScene;
use crate::timed_action::ActionSet;

/// Resolve and commit the player's animation state, then advance its mixer.
/// Runs before `character_motion_system` so a gesture started this tick
/// already shapes this tick's motion.
pub fn animation_state_system(world: &mut World, input: &InputState, now: Duration, dt: f32) {
    for (_e, (director, actions, local, mixer)) in world
        .query_mut::<(
            &mut AnimationDirector,
            &mut ActionSet,
            &mut LocalTransform,
            &mut ClipMixer,
        )>()
        .with::<&Player>()
    {
        let mut scene = RigScene::new(local, mixer);
        director.update(now, dt, input, actions, &mut scene);
    }
}

fn apply_pose(world: &mut World, body: &CharacterBody, pose: &BonePose) {
    macro_rules! set_rot {
        ($e:expr, $r:expr) => {
            if let Ok(mut lt) = world.get::<&mut LocalTransform>($e) {
                lt.rotation = $r;
            }
        };
    }
    if let Ok(mut hips) = world.get::<&mut LocalTransform>(body.hips) {
        hips.position.y = body.hips_height - pose.hips_drop;
    }
    set_rot!(body.torso, pose.torso_rot);
    set_rot!(body.head, pose.head_rot);
    set_rot!(body.left_upper_arm, pose.left_upper_arm_rot);
    set_rot!(body.left_forearm, pose.left_forearm_rot);
    set_rot!(body.right_upper_arm, pose.right_upper_arm_rot);
    set_rot!(body.right_forearm, pose.right_forearm_rot);
    set_rot!(body.left_upper_leg, pose.left_upper_leg_rot);
    set_rot!(body.left_lower_leg, pose.left_lower_leg_rot);
    set_rot!(body.right_upper_leg, pose.right_upper_leg_rot);
    set_rot!(body.right_lower_leg, pose.right_lower_leg_rot);
}

/// Copies each mixer's current pose onto the limb entities. Runs after the
/// mixers advanced and before `transform_propagation_system`.
pub fn pose_system(world: &mut World) {
    // Collect first so the query borrow is released before writing limbs.
    let rigs: Vec<(CharacterBody, BonePose)> = world
        .query::<(&CharacterBody, &ClipMixer)>()
        .iter()
        .map(|(_e, (body, mixer))| (*body, *mixer.pose()))
        .collect();

    for (body, pose) in rigs {
        apply_pose(world, &body, &pose);
    }
}
