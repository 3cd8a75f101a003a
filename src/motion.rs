//! Per-tick integration of the character transform.

use std::f32::consts::PI;
use std::time::Duration;

use crate::config::MotionConfig;
use crate::engine::input::Keys;
use crate::scene::CharacterScene;
use crate::timed_action::{ActionKind, ActionSet};

/// World-space placement of the character root. `yaw` 0 faces +Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CharacterTransform {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,
}

/// Who decides where the character faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacingMode {
    /// The character keeps its own yaw; the camera orbits relative to it.
    Follow,
    /// The character's yaw is slaved to the camera's horizontal angle.
    Align,
}

/// What one [`CharacterMotion::advance`] produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionStep {
    pub transform: CharacterTransform,
    pub moved: bool,
    pub rotated: bool,
    /// Azimuth the follow camera should orbit at this tick.
    pub camera_azimuth: f32,
}

impl MotionStep {
    /// Push the step to the scene. Height is written every tick.
    pub fn apply(&self, scene: &mut dyn CharacterScene) {
        let t = self.transform;
        if self.moved {
            scene.move_character(t.x, t.z);
        }
        if self.rotated {
            scene.rotate_character(t.yaw);
        }
        scene.lift_character(t.y);
    }
}

pub struct CharacterMotion {
    pub transform: CharacterTransform,
    pub mode: FacingMode,
    cfg: MotionConfig,
    /// Angle left in the current Q/E segment, per direction.
    turn_left_remaining: f32,
    turn_right_remaining: f32,
    /// Extra camera facing while the 180° turn plays, `π · progress`.
    sweep: f32,
}

impl CharacterMotion {
    pub fn new(cfg: MotionConfig) -> Self {
        Self {
            transform: CharacterTransform {
                y: cfg.base_y,
                ..CharacterTransform::default()
            },
            mode: FacingMode::Follow,
            cfg,
            turn_left_remaining: 0.0,
            turn_right_remaining: 0.0,
            sweep: 0.0,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.cfg
    }

    pub fn toggle_alignment(&mut self) -> FacingMode {
        self.mode = match self.mode {
            FacingMode::Follow => FacingMode::Align,
            FacingMode::Align => FacingMode::Follow,
        };
        log::info!("facing mode: {:?}", self.mode);
        self.mode
    }

    /// Angle the directional keys are relative to.
    pub fn movement_angle(&self, camera_horizontal: f32) -> f32 {
        match self.mode {
            FacingMode::Follow => self.transform.yaw,
            FacingMode::Align => camera_horizontal,
        }
    }

    pub fn camera_azimuth(&self, camera_horizontal: f32) -> f32 {
        match self.mode {
            FacingMode::Follow => self.transform.yaw + self.sweep + camera_horizontal,
            FacingMode::Align => camera_horizontal,
        }
    }

    /// Advance one tick. Speeds are per tick; timed actions use `now`.
    pub fn advance(
        &mut self,
        keys: &Keys,
        actions: &mut ActionSet,
        camera_horizontal: f32,
        now: Duration,
    ) -> MotionStep {
        let before = self.transform;

        self.update_jump(actions, now);
        self.update_turn180(actions, now);

        let suppressed = actions.get(ActionKind::Turn180).is_pending()
            || actions.is_active(ActionKind::Victory, now)
            || keys.crouch;

        if suppressed {
            self.turn_left_remaining = 0.0;
            self.turn_right_remaining = 0.0;
        } else {
            match self.mode {
                FacingMode::Follow => self.update_fixed_turn(keys),
                FacingMode::Align => self.transform.yaw = camera_horizontal,
            }
            let (dx, dz) = self.displacement(keys, self.movement_angle(camera_horizontal));
            self.transform.x += dx;
            self.transform.z += dz;
        }

        let t = self.transform;
        MotionStep {
            transform: t,
            moved: t.x != before.x || t.z != before.z,
            rotated: t.yaw != before.yaw,
            camera_azimuth: self.camera_azimuth(camera_horizontal),
        }
    }

    fn update_jump(&mut self, actions: &mut ActionSet, now: Duration) {
        self.transform.y = if actions.is_active(ActionKind::Jump, now) {
            let p = actions.progress(ActionKind::Jump, now);
            self.cfg.base_y + self.cfg.jump_height * (PI * p).sin()
        } else {
            self.cfg.base_y
        };
    }

    fn update_turn180(&mut self, actions: &mut ActionSet, now: Duration) {
        let turn = actions.get_mut(ActionKind::Turn180);
        if turn.needs_commit(now) {
            self.transform.yaw += PI;
            self.sweep = 0.0;
            turn.commit();
            log::debug!("turn180 committed, yaw {:.3}", self.transform.yaw);
        } else if turn.is_pending() {
            self.sweep = PI * turn.progress(now);
        } else {
            self.sweep = 0.0;
        }
    }

    fn update_fixed_turn(&mut self, keys: &Keys) {
        let rate = self.cfg.turn_rate;
        let segment = self.cfg.turn_segment;
        let step = |remaining: &mut f32| {
            if *remaining <= 0.0 {
                *remaining = segment;
            }
            let d = rate.min(*remaining);
            *remaining -= d;
            d
        };

        if keys.turn_left {
            self.transform.yaw += step(&mut self.turn_left_remaining);
        } else {
            self.turn_left_remaining = 0.0;
        }
        if keys.turn_right {
            self.transform.yaw -= step(&mut self.turn_right_remaining);
        } else {
            self.turn_right_remaining = 0.0;
        }
    }

    /// Forward beats backward and left beats right. Diagonals are not
    /// normalised.
    fn displacement(&self, keys: &Keys, angle: f32) -> (f32, f32) {
        let speed = if keys.run {
            self.cfg.run_speed
        } else {
            self.cfg.move_speed
        };
        let (sin, cos) = angle.sin_cos();
        let (mut dx, mut dz) = (0.0, 0.0);

        if keys.forward {
            dx += sin * speed;
            dz += cos * speed;
        } else if keys.backward {
            dx -= sin * speed;
            dz -= cos * speed;
        }

        if keys.left {
            dx += cos * speed;
            dz -= sin * speed;
        } else if keys.right {
            dx -= cos * speed;
            dz += sin * speed;
        }
        (dx, dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup() -> (CharacterMotion, ActionSet) {
        (
            CharacterMotion::new(MotionConfig::default()),
            ActionSet::new(&TimingConfig::default()),
        )
    }

    #[test]
    fn walking_forward_at_yaw_zero_moves_along_z() {
        let (mut motion, mut actions) = setup();
        let keys = Keys {
            forward: true,
            ..Keys::default()
        };
        let step = motion.advance(&keys, &mut actions, 0.0, ms(16));
        assert!(step.moved);
        assert!((step.transform.z - 0.035).abs() < 1e-6);
        assert!(step.transform.x.abs() < 1e-6);
    }

    #[test]
    fn diagonal_is_not_normalised() {
        let (mut motion, mut actions) = setup();
        let keys = Keys {
            forward: true,
            left: true,
            run: true,
            ..Keys::default()
        };
        let step = motion.advance(&keys, &mut actions, 0.0, ms(16));
        let len = (step.transform.x.powi(2) + step.transform.z.powi(2)).sqrt();
        assert!((len - 0.06 * 2f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn crouch_suppresses_movement_and_turning() {
        let (mut motion, mut actions) = setup();
        let keys = Keys {
            forward: true,
            turn_left: true,
            crouch: true,
            ..Keys::default()
        };
        let step = motion.advance(&keys, &mut actions, 0.0, ms(16));
        assert!(!step.moved);
        assert!(!step.rotated);
    }

    #[test]
    fn fixed_turn_caps_at_segment_end() {
        let (mut motion, mut actions) = setup();
        let keys = Keys {
            turn_left: true,
            ..Keys::default()
        };
        let segment = motion.config().turn_segment;
        let rate = motion.config().turn_rate;
        let ticks = (segment / rate).ceil() as u64;
        for i in 0..ticks {
            motion.advance(&keys, &mut actions, 0.0, ms(16 * i));
        }
        assert!((motion.transform.yaw - segment).abs() < 1e-4);
    }

    #[test]
    fn align_mode_slaves_yaw_to_camera() {
        let (mut motion, mut actions) = setup();
        motion.toggle_alignment();
        let keys = Keys {
            forward: true,
            ..Keys::default()
        };
        let step = motion.advance(&keys, &mut actions, PI / 2.0, ms(16));
        assert_eq!(step.transform.yaw, PI / 2.0);
        assert!((step.transform.x - 0.035).abs() < 1e-6);
        assert_eq!(step.camera_azimuth, PI / 2.0);
    }
}
