use std::time::Duration;

use glam::Vec3;
use hecs::{Entity, Ref, RefMut, World};

use crate::animation::{AnimState, AnimationDirector, ClipBrowser};
use crate::camera::FollowCamera;
use crate::components::{GlobalTransform, LocalTransform, Player};
use crate::config::Config;
use crate::engine::input::{Action, InputState};
use crate::motion::{CharacterMotion, CharacterTransform, FacingMode};
use crate::pose::{ClipMixer, ClipSet};
use crate::systems::{
    animation_state_system, character_motion_system, pose_system, transform_propagation_system,
};
use crate::timed_action::{ActionKind, ActionSet};

pub const CONTROLS_HELP: &str = "\
W/S or Up/Down   walk forward / back
A/D or Left/Right  strafe
Shift            run
Ctrl             crouch
Q/E              turn left / right
R                turn 180°
Space            jump
V                victory pose
T                toggle camera alignment
H                show / hide controls
F3               clip browser on / off
Shift+N/P/R      next / previous / random clip (browser on)
Shift+I/L/M/D    clip info / list / list / dump state (browser on)
Click            lock pointer (Esc releases)
Mouse / wheel    orbit / zoom";

/// Spawn the logical player: root transform plus every per-character
/// component the tick drives. Limbs are attached separately.
pub fn spawn_player(world: &mut World, config: &Config) -> Entity {
    let mut mixer = ClipMixer::new(ClipSet::procedural(), config.timing.crossfade_secs());
    mixer.play(AnimState::Idle);
    world.spawn((
        Player,
        LocalTransform::new(Vec3::new(0.0, config.motion.base_y, 0.0)),
        GlobalTransform::default(),
        CharacterMotion::new(config.motion.clone()),
        AnimationDirector::new(&config.timing),
        ActionSet::new(&config.timing),
        mixer,
    ))
}

/// Composition root of one session: the ECS world, the player entity and the
/// camera. The platform owns the [`InputState`] and hands it to [`tick`](Self::tick).
pub struct Game {
    pub world: World,
    pub player: Entity,
    pub camera: FollowCamera,
    pub config: Config,
    pub controls_visible: bool,
    /// While enabled the resolver is paused and clips are picked by hand.
    pub browser: ClipBrowser,
}

impl Game {
    pub fn new(config: Config) -> Self {
        let mut world = World::new();
        let player = spawn_player(&mut world, &config);
        Self {
            world,
            player,
            camera: FollowCamera::new(config.camera.clone()),
            config,
            controls_visible: false,
            browser: ClipBrowser::new(),
        }
    }

    /// Move the player on the ground plane without animating it there.
    pub fn place_player(&mut self, x: f32, z: f32) {
        if let Ok((motion, local)) = self
            .world
            .query_one_mut::<(&mut CharacterMotion, &mut LocalTransform)>(self.player)
        {
            motion.transform.x = x;
            motion.transform.z = z;
            local.position.x = x;
            local.position.z = z;
        }
    }

    pub fn tick(&mut self, input: &mut InputState, now: Duration, dt: f32) {
        input.resolve_conflicts();

        for action in input.take_pressed() {
            self.handle_press(action, now);
        }

        let (dx, dy) = input.take_mouse();
        self.camera.look(dx, dy);
        self.camera.zoom(input.take_wheel());

        if self.browser.is_enabled() {
            if let Ok(mut mixer) = self.world.get::<&mut ClipMixer>(self.player) {
                mixer.advance(dt);
            }
        } else {
            animation_state_system(&mut self.world, input, now, dt);
        }

        let keys = input.keys();
        if let Some(step) =
            character_motion_system(&mut self.world, &keys, self.camera.horizontal_angle, now)
        {
            let t = step.transform;
            self.camera.update(Vec3::new(t.x, t.y, t.z), step.camera_azimuth);
        }

        pose_system(&mut self.world);
        transform_propagation_system(&mut self.world);
    }

    fn handle_press(&mut self, action: Action, now: Duration) {
        match action {
            Action::AlignToggle => {
                if let Ok(mut motion) = self.world.get::<&mut CharacterMotion>(self.player) {
                    motion.toggle_alignment();
                }
                self.camera.reset_angles();
            }
            Action::ToggleControls => {
                self.controls_visible = !self.controls_visible;
                if self.controls_visible {
                    log::info!("controls:\n{CONTROLS_HELP}");
                } else {
                    log::info!("controls hidden");
                }
            }
            Action::DebugToggle => {
                let clip = if self.browser.toggle() {
                    self.browser.current()
                } else {
                    self.state()
                };
                self.play_clip(clip);
            }
            _ if !self.browser.is_enabled() => {}
            Action::DebugNext => {
                let clip = self.browser.next();
                self.play_clip(clip);
            }
            Action::DebugPrevious => {
                let clip = self.browser.previous();
                self.play_clip(clip);
            }
            Action::DebugRandom => {
                let clip = self.browser.random(&mut rand::thread_rng());
                self.play_clip(clip);
            }
            Action::DebugInfo => {
                let clip = self.browser.current();
                log::info!("clip {}: {} ({:?})", self.browser.index(), clip.clip_name(), clip);
            }
            Action::DebugList => {
                log::info!("clips:\n{}", ClipBrowser::listing().join("\n"));
            }
            Action::DebugDump => self.log_debug_state(now),
            _ => {}
        }
    }

    /// Hand a clip straight to the mixer, bypassing the director.
    fn play_clip(&mut self, clip: AnimState) -> bool {
        let played = self
            .world
            .get::<&mut ClipMixer>(self.player)
            .map(|mut mixer| mixer.play(clip))
            .unwrap_or(false);
        if played {
            log::info!("playing clip {:?}", clip.clip_name());
        } else {
            log::warn!("clip {:?} not found", clip.clip_name());
        }
        played
    }

    fn log_debug_state(&self, now: Duration) {
        if let Ok(director) = self.world.get::<&AnimationDirector>(self.player) {
            log::info!(
                "state {:?} (from {:?}) for {:?}",
                director.state(),
                director.previous(),
                director.time_in_state(now)
            );
        }
        if let Some(mixer) = self.mixer() {
            log::info!("mixer {:?}, blend {:.2}", mixer.current(), mixer.blend());
        }
        if let Some(actions) = self.actions() {
            let running: Vec<ActionKind> = ActionKind::ALL
                .into_iter()
                .filter(|&kind| actions.get(kind).peek_active(now))
                .collect();
            log::info!("running gestures: {running:?}");
        }
        let t = self.transform();
        log::info!(
            "facing {:?}, yaw {:.3}, camera forward {}, player forward {}",
            self.facing_mode(),
            t.yaw,
            self.camera.forward(),
            self.camera.player_forward(t.yaw)
        );
    }

    pub fn state(&self) -> AnimState {
        self.world
            .get::<&AnimationDirector>(self.player)
            .map(|d| d.state())
            .unwrap_or(AnimState::Idle)
    }

    pub fn transform(&self) -> CharacterTransform {
        self.world
            .get::<&CharacterMotion>(self.player)
            .map(|m| m.transform)
            .unwrap_or_default()
    }

    pub fn facing_mode(&self) -> FacingMode {
        self.world
            .get::<&CharacterMotion>(self.player)
            .map(|m| m.mode)
            .unwrap_or(FacingMode::Follow)
    }

    pub fn actions(&self) -> Option<Ref<'_, ActionSet>> {
        self.world.get::<&ActionSet>(self.player).ok()
    }

    pub fn actions_mut(&self) -> Option<RefMut<'_, ActionSet>> {
        self.world.get::<&mut ActionSet>(self.player).ok()
    }

    pub fn mixer(&self) -> Option<Ref<'_, ClipMixer>> {
        self.world.get::<&ClipMixer>(self.player).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_toggle_flips_mode_and_resets_horizontal_angle() {
        let mut game = Game::new(Config::default());
        let mut input = InputState::new(Duration::from_millis(300));
        game.camera.horizontal_angle = 1.0;
        input.set_key(Action::AlignToggle, true, Duration::from_millis(5));
        game.tick(&mut input, Duration::from_millis(16), 0.016);
        assert_eq!(game.facing_mode(), FacingMode::Align);
        assert_eq!(game.camera.horizontal_angle, 0.0);
    }

    #[test]
    fn place_player_moves_root_and_motion_state() {
        let mut game = Game::new(Config::default());
        game.place_player(3.0, -4.0);
        let t = game.transform();
        assert_eq!((t.x, t.z), (3.0, -4.0));
        let local = game.world.get::<&LocalTransform>(game.player).unwrap();
        assert_eq!(local.position.x, 3.0);
        assert_eq!(local.position.z, -4.0);
    }

    #[test]
    fn clip_browser_overrides_resolver_until_switched_off() {
        let mut game = Game::new(Config::default());
        let mut input = InputState::new(Duration::from_millis(300));

        input.set_key(Action::DebugToggle, true, Duration::from_millis(0));
        input.set_key(Action::DebugNext, true, Duration::from_millis(0));
        input.set_key(Action::Forward, true, Duration::from_millis(0));
        game.tick(&mut input, Duration::from_millis(16), 0.016);

        assert!(game.browser.is_enabled());
        assert_eq!(game.mixer().unwrap().current(), Some(AnimState::TurnLeft));
        // Walking still moves the character but the director stays put.
        assert_eq!(game.state(), AnimState::Idle);
        assert!(game.transform().z > 0.0);

        input.set_key(Action::DebugToggle, false, Duration::from_millis(100));
        input.set_key(Action::DebugToggle, true, Duration::from_millis(200));
        game.tick(&mut input, Duration::from_millis(216), 0.016);
        assert!(!game.browser.is_enabled());
        assert_eq!(game.state(), AnimState::WalkForward);
        assert_eq!(game.mixer().unwrap().current(), Some(AnimState::WalkForward));
    }

    #[test]
    fn browser_keys_do_nothing_while_off() {
        let mut game = Game::new(Config::default());
        let mut input = InputState::new(Duration::from_millis(300));
        input.set_key(Action::DebugNext, true, Duration::from_millis(0));
        game.tick(&mut input, Duration::from_millis(16), 0.016);
        assert_eq!(game.browser.index(), 0);
        assert_eq!(game.mixer().unwrap().current(), Some(AnimState::Idle));
    }

    #[test]
    fn controls_toggle_is_debounced() {
        let mut game = Game::new(Config::default());
        let mut input = InputState::new(Duration::from_millis(300));
        input.set_key(Action::ToggleControls, true, Duration::from_millis(0));
        input.set_key(Action::ToggleControls, false, Duration::from_millis(50));
        input.set_key(Action::ToggleControls, true, Duration::from_millis(100));
        game.tick(&mut input, Duration::from_millis(116), 0.016);
        assert!(game.controls_visible);
    }
}
