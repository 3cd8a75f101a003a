use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Named player actions. Device codes are mapped onto these by the platform layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Run,
    Crouch,
    TurnLeft,
    TurnRight,
    Turn180,
    Jump,
    Victory,
    AlignToggle,
    ToggleControls,
    DebugToggle,
    DebugNext,
    DebugPrevious,
    DebugRandom,
    DebugInfo,
    DebugList,
    DebugDump,
}

impl Action {
    pub const COUNT: usize = 20;

    pub const ALL: [Action; Action::COUNT] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Run,
        Action::Crouch,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Turn180,
        Action::Jump,
        Action::Victory,
        Action::AlignToggle,
        Action::ToggleControls,
        Action::DebugToggle,
        Action::DebugNext,
        Action::DebugPrevious,
        Action::DebugRandom,
        Action::DebugInfo,
        Action::DebugList,
        Action::DebugDump,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Backward => "backward",
            Action::Left => "left",
            Action::Right => "right",
            Action::Run => "run",
            Action::Crouch => "crouch",
            Action::TurnLeft => "turnLeft",
            Action::TurnRight => "turnRight",
            Action::Turn180 => "turn180",
            Action::Jump => "jump",
            Action::Victory => "victory",
            Action::AlignToggle => "alignToggle",
            Action::ToggleControls => "toggleControls",
            Action::DebugToggle => "debugToggle",
            Action::DebugNext => "debugNext",
            Action::DebugPrevious => "debugPrevious",
            Action::DebugRandom => "debugRandom",
            Action::DebugInfo => "debugInfo",
            Action::DebugList => "debugList",
            Action::DebugDump => "debugDump",
        }
    }

    /// Gesture keys only accept a new press after the debounce window.
    fn is_debounced(self) -> bool {
        matches!(
            self,
            Action::Turn180 | Action::Jump | Action::Victory | Action::ToggleControls
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Error;

    /// Accepts the camelCase names used in config files, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// Copyable snapshot of the held flags, read by the resolver and motion code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
    pub crouch: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub turn180: bool,
    pub jump: bool,
    pub victory: bool,
}

impl Keys {
    /// Any of the four directional keys.
    pub fn moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Run => self.run,
            Action::Crouch => self.crouch,
            Action::TurnLeft => self.turn_left,
            Action::TurnRight => self.turn_right,
            Action::Turn180 => self.turn180,
            Action::Jump => self.jump,
            Action::Victory => self.victory,
            _ => false,
        }
    }
}

/// Raw input as delivered by the platform: held flags, last accepted press per
/// action, press edges for the current frame and accumulated mouse motion.
///
/// The platform layer is the only writer. The tick reads it once, after
/// [`InputState::resolve_conflicts`].
pub struct InputState {
    held: [bool; Action::COUNT],
    last_press: [Option<Duration>; Action::COUNT],
    pressed: Vec<Action>,
    debounce: Duration,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    pub wheel: f32,
}

impl InputState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            held: [false; Action::COUNT],
            last_press: [None; Action::COUNT],
            pressed: Vec::new(),
            debounce,
            mouse_dx: 0.0,
            mouse_dy: 0.0,
            wheel: 0.0,
        }
    }

    pub fn set_key(&mut self, action: Action, pressed: bool, now: Duration) {
        let i = action.index();
        if !pressed {
            self.held[i] = false;
            return;
        }
        if self.held[i] {
            return;
        }
        if action.is_debounced() {
            if let Some(last) = self.last_press[i] {
                if now.saturating_sub(last) <= self.debounce {
                    return;
                }
            }
        }
        self.held[i] = true;
        self.last_press[i] = Some(now);
        self.pressed.push(action);
    }

    /// Forward and backward: the later press wins. Turn left and right: both dropped.
    pub fn resolve_conflicts(&mut self) {
        let fwd = Action::Forward.index();
        let back = Action::Backward.index();
        if self.held[fwd] && self.held[back] {
            if self.last_press[fwd] > self.last_press[back] {
                self.held[back] = false;
            } else {
                self.held[fwd] = false;
            }
        }

        let tl = Action::TurnLeft.index();
        let tr = Action::TurnRight.index();
        if self.held[tl] && self.held[tr] {
            self.held[tl] = false;
            self.held[tr] = false;
        }
    }

    /// Focus lost: nothing stays held and queued edges and mouse motion are dropped.
    pub fn reset_all(&mut self) {
        self.held = [false; Action::COUNT];
        self.pressed.clear();
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        self.wheel = 0.0;
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    pub fn last_press(&self, action: Action) -> Option<Duration> {
        self.last_press[action.index()]
    }

    /// How long `action` has been held, or `None` when it is up.
    pub fn held_for(&self, action: Action, now: Duration) -> Option<Duration> {
        if !self.is_held(action) {
            return None;
        }
        self.last_press(action).map(|t| now.saturating_sub(t))
    }

    pub fn keys(&self) -> Keys {
        let h = |a: Action| self.held[a.index()];
        Keys {
            forward: h(Action::Forward),
            backward: h(Action::Backward),
            left: h(Action::Left),
            right: h(Action::Right),
            run: h(Action::Run),
            crouch: h(Action::Crouch),
            turn_left: h(Action::TurnLeft),
            turn_right: h(Action::TurnRight),
            turn180: h(Action::Turn180),
            jump: h(Action::Jump),
            victory: h(Action::Victory),
        }
    }

    /// Press edges recorded since the last call.
    pub fn take_pressed(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pressed)
    }

    pub fn add_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse_dx += dx;
        self.mouse_dy += dy;
    }

    pub fn add_wheel(&mut self, delta: f32) {
        self.wheel += delta;
    }

    pub fn take_mouse(&mut self) -> (f32, f32) {
        let d = (self.mouse_dx, self.mouse_dy);
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        d
    }

    pub fn take_wheel(&mut self) -> f32 {
        std::mem::take(&mut self.wheel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn later_backward_press_beats_forward() {
        let mut input = InputState::new(ms(300));
        input.set_key(Action::Forward, true, ms(10));
        input.set_key(Action::Backward, true, ms(20));
        input.resolve_conflicts();
        let keys = input.keys();
        assert!(!keys.forward);
        assert!(keys.backward);
    }

    #[test]
    fn turn_conflict_clears_both() {
        let mut input = InputState::new(ms(300));
        input.set_key(Action::TurnLeft, true, ms(0));
        input.set_key(Action::TurnRight, true, ms(5));
        input.resolve_conflicts();
        let keys = input.keys();
        assert!(!keys.turn_left);
        assert!(!keys.turn_right);
    }

    #[test]
    fn focus_loss_releases_everything() {
        use crate::animation::{resolve, AnimState, ResolveCtx};
        use crate::timed_action::ActionView;

        let mut input = InputState::new(ms(300));
        input.set_key(Action::Forward, true, ms(0));
        input.set_key(Action::Jump, true, ms(0));
        input.reset_all();

        assert_eq!(input.keys(), Keys::default());
        assert_eq!(input.held_for(Action::Forward, ms(100)), None);
        assert!(input.take_pressed().is_empty());

        // A jump key that was down before focus went away cannot fire it.
        let decision = resolve(&ResolveCtx {
            keys: input.keys(),
            actions: ActionView::all_startable(),
            current: AnimState::Idle,
            time_in_state: ms(1000),
            turn_left_held_for: input.held_for(Action::TurnLeft, ms(100)),
            turn_right_held_for: input.held_for(Action::TurnRight, ms(100)),
            turn_delay: ms(200),
            turn_linger: ms(300),
        });
        assert_eq!(decision.state, AnimState::Idle);
        assert_eq!(decision.start, None);
    }

    #[test]
    fn gesture_press_inside_debounce_is_dropped() {
        let mut input = InputState::new(ms(300));
        input.set_key(Action::Jump, true, ms(1000));
        input.set_key(Action::Jump, false, ms(1050));
        input.set_key(Action::Jump, true, ms(1200));
        assert!(!input.is_held(Action::Jump));
        input.set_key(Action::Jump, true, ms(1400));
        assert!(input.is_held(Action::Jump));
        assert_eq!(input.take_pressed(), vec![Action::Jump, Action::Jump]);
    }

    #[test]
    fn align_toggle_edges_once_per_hold() {
        let mut input = InputState::new(ms(300));
        input.set_key(Action::AlignToggle, true, ms(0));
        input.set_key(Action::AlignToggle, true, ms(16));
        assert_eq!(input.take_pressed(), vec![Action::AlignToggle]);
        input.set_key(Action::AlignToggle, false, ms(32));
        input.set_key(Action::AlignToggle, true, ms(48));
        assert_eq!(input.take_pressed(), vec![Action::AlignToggle]);
    }

    #[test]
    fn held_for_tracks_press_time() {
        let mut input = InputState::new(ms(300));
        input.set_key(Action::TurnLeft, true, ms(100));
        assert_eq!(input.held_for(Action::TurnLeft, ms(350)), Some(ms(250)));
        input.set_key(Action::TurnLeft, false, ms(400));
        assert_eq!(input.held_for(Action::TurnLeft, ms(450)), None);
    }

    #[test]
    fn action_names_parse_case_insensitively() {
        assert_eq!("turn180".parse::<Action>().unwrap(), Action::Turn180);
        assert_eq!("TURNLEFT".parse::<Action>().unwrap(), Action::TurnLeft);
        assert!(matches!("fly".parse::<Action>(), Err(Error::UnknownAction(_))));
    }
}
