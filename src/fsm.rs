use std::time::Duration;

/// Minimal finite-state-machine container.
///
/// `S` is the state type (a plain enum). The machine tracks the current
/// state, the previous one and when the current state was entered. Deciding
/// the next state is left to the caller (see `animation::resolver`).
///
/// ```
/// use arena::fsm::StateMachine;
/// use std::time::Duration;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Door { Open, Shut }
///
/// let mut fsm = StateMachine::new(Door::Shut);
/// assert!(fsm.go(Door::Open, Duration::from_millis(10)));
/// assert!(!fsm.go(Door::Open, Duration::from_millis(20)));
/// assert_eq!(fsm.previous, Door::Shut);
/// ```
#[derive(Clone, Debug)]
pub struct StateMachine<S: Copy + PartialEq> {
    pub state: S,
    pub previous: S,
    /// Seconds spent in the current state, advanced by [`tick`](Self::tick).
    pub elapsed: f32,
    entered_at: Duration,
    entered_this_frame: bool,
}

impl<S: Copy + PartialEq> StateMachine<S> {
    /// Start in `initial`. `just_entered()` is true until the first tick.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            previous: initial,
            elapsed: 0.0,
            entered_at: Duration::ZERO,
            entered_this_frame: true,
        }
    }

    /// Switch to `next` if it differs from the current state. Returns whether
    /// a transition happened.
    pub fn go(&mut self, next: S, now: Duration) -> bool {
        if self.state == next {
            return false;
        }
        self.force_go(next, now);
        true
    }

    /// Re-enter even when `next` equals the current state; restarts the timers.
    pub fn force_go(&mut self, next: S, now: Duration) {
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0.0;
        self.entered_at = now;
        self.entered_this_frame = true;
    }

    /// Call once per frame after transitions are processed.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_frame = false;
    }

    pub fn just_entered(&self) -> bool {
        self.entered_this_frame
    }

    pub fn entered_at(&self) -> Duration {
        self.entered_at
    }

    /// Wall-clock time in the current state.
    pub fn time_in_state(&self, now: Duration) -> Duration {
        now.saturating_sub(self.entered_at)
    }
}
