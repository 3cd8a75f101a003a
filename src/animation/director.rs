use std::time::Duration;

use crate::config::TimingConfig;
use crate::engine::input::{Action, InputState};
use crate::fsm::StateMachine;
use crate::scene::CharacterScene;
use crate::timed_action::{ActionKind, ActionSet};

use super::resolver::{resolve_named, AnimState, ResolveCtx};

/// Owns the current animation state and commits resolver decisions.
///
/// Decisions are re-evaluated at most once per `resolve_interval`, and never
/// while the current state still has a minimum play-out left. A transition is
/// committed only when the scene accepts the clip.
pub struct AnimationDirector {
    fsm: StateMachine<AnimState>,
    last_resolve: Option<Duration>,
    rejected: Option<AnimState>,
    resolve_interval: Duration,
    turn_delay: Duration,
    turn_linger: Duration,
    jump_moving: Duration,
    jump_standing: Duration,
    turn180_min: Duration,
}

impl AnimationDirector {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            fsm: StateMachine::new(AnimState::Idle),
            last_resolve: None,
            rejected: None,
            resolve_interval: timing.resolve_interval(),
            turn_delay: timing.turn_delay(),
            turn_linger: timing.turn_linger(),
            jump_moving: timing.jump_moving(),
            jump_standing: timing.jump_standing(),
            turn180_min: timing.turn180(),
        }
    }

    pub fn state(&self) -> AnimState {
        self.fsm.state
    }

    pub fn previous(&self) -> AnimState {
        self.fsm.previous
    }

    pub fn just_entered(&self) -> bool {
        self.fsm.just_entered()
    }

    pub fn time_in_state(&self, now: Duration) -> Duration {
        self.fsm.time_in_state(now)
    }

    fn min_play_out(&self, state: AnimState) -> Duration {
        match state {
            AnimState::Turn180 => self.turn180_min,
            _ => Duration::ZERO,
        }
    }

    fn throttled(&self, now: Duration) -> bool {
        if let Some(last) = self.last_resolve {
            if now.saturating_sub(last) < self.resolve_interval {
                return true;
            }
        }
        self.fsm.time_in_state(now) < self.min_play_out(self.fsm.state)
    }

    /// Run one tick. Returns whether the animation state changed.
    pub fn update(
        &mut self,
        now: Duration,
        dt: f32,
        input: &InputState,
        actions: &mut ActionSet,
        scene: &mut dyn CharacterScene,
    ) -> bool {
        self.fsm.tick(dt);

        let keys = input.keys();
        actions.release_unheld(&keys);

        let changed = if self.throttled(now) {
            false
        } else {
            self.last_resolve = Some(now);
            let ctx = ResolveCtx {
                keys,
                actions: actions.view(now),
                current: self.fsm.state,
                time_in_state: self.fsm.time_in_state(now),
                turn_left_held_for: input.held_for(Action::TurnLeft, now),
                turn_right_held_for: input.held_for(Action::TurnRight, now),
                turn_delay: self.turn_delay,
                turn_linger: self.turn_linger,
            };
            let (rule, decision) = resolve_named(&ctx);
            self.commit(rule, decision.state, decision.start, now, actions, scene)
        };

        scene.update_animation_clock(dt);
        changed
    }

    fn commit(
        &mut self,
        rule: &str,
        next: AnimState,
        start: Option<ActionKind>,
        now: Duration,
        actions: &mut ActionSet,
        scene: &mut dyn CharacterScene,
    ) -> bool {
        if next == self.fsm.state && start.is_none() {
            return false;
        }

        if !scene.play_animation(next) {
            if self.rejected != Some(next) {
                log::warn!(
                    "no clip '{}' for {:?}, staying in {:?}",
                    next.clip_name(),
                    next,
                    self.fsm.state
                );
                self.rejected = Some(next);
            }
            return false;
        }
        self.rejected = None;

        if let Some(kind) = start {
            let duration = match (kind, next) {
                (ActionKind::Jump, AnimState::JumpMoving) => Some(self.jump_moving),
                (ActionKind::Jump, _) => Some(self.jump_standing),
                _ => None,
            };
            if actions.start(kind, now, duration) {
                log::debug!("started {:?} at {:?}", kind, now);
            }
        }

        log::debug!("anim {:?} -> {:?} ({rule})", self.fsm.state, next);
        // A restarted gesture replays its clip from the top.
        self.fsm.force_go(next, now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Clips {
        played: Vec<AnimState>,
        missing: Vec<AnimState>,
    }

    impl CharacterScene for Clips {
        fn move_character(&mut self, _x: f32, _z: f32) {}
        fn rotate_character(&mut self, _yaw: f32) {}
        fn lift_character(&mut self, _y: f32) {}
        fn play_animation(&mut self, state: AnimState) -> bool {
            if self.missing.contains(&state) {
                return false;
            }
            self.played.push(state);
            true
        }
        fn update_animation_clock(&mut self, _dt: f32) {}
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn re_evaluation_is_throttled() {
        let timing = TimingConfig::default();
        let mut director = AnimationDirector::new(&timing);
        let mut actions = ActionSet::new(&timing);
        let mut input = InputState::new(timing.debounce());
        let mut scene = Clips::default();

        assert!(!director.update(ms(0), 0.016, &input, &mut actions, &mut scene));
        input.set_key(Action::Forward, true, ms(20));
        assert!(!director.update(ms(50), 0.016, &input, &mut actions, &mut scene));
        assert_eq!(director.state(), AnimState::Idle);
        assert!(director.update(ms(100), 0.016, &input, &mut actions, &mut scene));
        assert_eq!(director.state(), AnimState::WalkForward);
    }

    #[test]
    fn missing_clip_keeps_state_and_skips_action() {
        let timing = TimingConfig::default();
        let mut director = AnimationDirector::new(&timing);
        let mut actions = ActionSet::new(&timing);
        let mut input = InputState::new(timing.debounce());
        let mut scene = Clips {
            missing: vec![AnimState::Victory],
            ..Clips::default()
        };

        input.set_key(Action::Victory, true, ms(0));
        assert!(!director.update(ms(0), 0.016, &input, &mut actions, &mut scene));
        assert_eq!(director.state(), AnimState::Idle);
        assert!(!actions.is_active(ActionKind::Victory, ms(10)));
        assert!(scene.played.is_empty());
    }

    #[test]
    fn turn180_holds_for_its_play_out() {
        let timing = TimingConfig::default();
        let mut director = AnimationDirector::new(&timing);
        let mut actions = ActionSet::new(&timing);
        let mut input = InputState::new(timing.debounce());
        let mut scene = Clips::default();

        input.set_key(Action::Turn180, true, ms(0));
        director.update(ms(0), 0.016, &input, &mut actions, &mut scene);
        assert_eq!(director.state(), AnimState::Turn180);

        input.set_key(Action::Turn180, false, ms(50));
        input.set_key(Action::Forward, true, ms(60));
        for t in (100..800).step_by(100) {
            director.update(ms(t), 0.016, &input, &mut actions, &mut scene);
            assert_eq!(director.state(), AnimState::Turn180);
        }
        director.update(ms(900), 0.016, &input, &mut actions, &mut scene);
        assert_eq!(director.state(), AnimState::WalkForward);
    }
}
