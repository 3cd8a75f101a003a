//! The boundary between the motion core and whatever shows the character.

use glam::Quat;

use crate::animation::AnimState;
use crate::components::LocalTransform;
use crate::pose::ClipMixer;

/// What the core needs from the scene holding the character model.
pub trait CharacterScene {
    fn move_character(&mut self, x: f32, z: f32);
    fn rotate_character(&mut self, yaw: f32);
    fn lift_character(&mut self, y: f32);
    /// Cross-fade to the clip for `state`. `false` if the model has no such clip.
    fn play_animation(&mut self, state: AnimState) -> bool;
    fn update_animation_clock(&mut self, dt: f32);
}

/// The ECS-backed scene: the player's root transform plus its clip mixer.
pub struct RigScene<'a> {
    pub local: &'a mut LocalTransform,
    pub mixer: &'a mut ClipMixer,
}

impl<'a> RigScene<'a> {
    pub fn new(local: &'a mut LocalTransform, mixer: &'a mut ClipMixer) -> Self {
        Self { local, mixer }
    }
}

impl CharacterScene for RigScene<'_> {
    fn move_character(&mut self, x: f32, z: f32) {
        self.local.position.x = x;
        self.local.position.z = z;
    }

    fn rotate_character(&mut self, yaw: f32) {
        self.local.rotation = Quat::from_rotation_y(yaw);
    }

    fn lift_character(&mut self, y: f32) {
        self.local.position.y = y;
    }

    fn play_animation(&mut self, state: AnimState) -> bool {
        self.mixer.play(state)
    }

    fn update_animation_clock(&mut self, dt: f32) {
        self.mixer.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::pose::ClipSet;

    #[test]
    fn rig_scene_writes_root_transform() {
        let mut local = LocalTransform::new(Vec3::ZERO);
        let mut mixer = ClipMixer::new(ClipSet::procedural(), 0.2);
        let mut scene = RigScene::new(&mut local, &mut mixer);
        scene.move_character(1.0, -2.0);
        scene.lift_character(0.3);
        scene.rotate_character(std::f32::consts::FRAC_PI_2);
        assert_eq!(local.position, Vec3::new(1.0, 0.3, -2.0));
        let forward = local.rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }
}
