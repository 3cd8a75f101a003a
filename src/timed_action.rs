//! Non-preemptible timed gestures (jump, victory pose, 180° turn, fixed turns).
//!
//! Every gesture is one [`TimedAction`]: it runs for a fixed duration, cannot
//! be restarted while running, and stays locked afterwards until its
//! [`CooldownPolicy`] allows a new start. [`ActionSet`] owns exactly one
//! instance per [`ActionKind`], so two concurrent runs of the same gesture
//! cannot exist.

use std::time::Duration;

use crate::config::TimingConfig;
use crate::engine::input::{Action, Keys};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Jump,
    Victory,
    Turn180,
    /// Gates only the turn clip replay; rotation comes from the held key in
    /// `CharacterMotion::update_fixed_turn`.
    TurnLeft,
    /// See [`ActionKind::TurnLeft`].
    TurnRight,
}

impl ActionKind {
    pub const COUNT: usize = 5;

    pub const ALL: [ActionKind; ActionKind::COUNT] = [
        ActionKind::Jump,
        ActionKind::Victory,
        ActionKind::Turn180,
        ActionKind::TurnLeft,
        ActionKind::TurnRight,
    ];

    pub fn policy(self) -> CooldownPolicy {
        match self {
            ActionKind::Jump | ActionKind::Victory => CooldownPolicy::ExpiryGated,
            ActionKind::Turn180 | ActionKind::TurnLeft | ActionKind::TurnRight => {
                CooldownPolicy::ReleaseGated
            }
        }
    }

    /// The input that fires this gesture.
    pub fn trigger(self) -> Action {
        match self {
            ActionKind::Jump => Action::Jump,
            ActionKind::Victory => Action::Victory,
            ActionKind::Turn180 => Action::Turn180,
            ActionKind::TurnLeft => Action::TurnLeft,
            ActionKind::TurnRight => Action::TurnRight,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// When a finished gesture may start again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownPolicy {
    /// Unlocked as soon as the play-out expires.
    ExpiryGated,
    /// Unlocked only once the play-out expired and the trigger key is up.
    ReleaseGated,
}

#[derive(Clone, Debug)]
pub struct TimedAction {
    kind: ActionKind,
    policy: CooldownPolicy,
    duration: Duration,
    started_at: Option<Duration>,
    active: bool,
    locked: bool,
    trigger_held: bool,
    committed: bool,
}

impl TimedAction {
    pub fn new(kind: ActionKind, duration: Duration) -> Self {
        Self {
            kind,
            policy: kind.policy(),
            duration,
            started_at: None,
            active: false,
            locked: false,
            trigger_held: false,
            committed: false,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn policy(&self) -> CooldownPolicy {
        self.policy
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Change the play-out length. Ignored while a run is in flight.
    pub fn set_duration(&mut self, duration: Duration) {
        if !self.active {
            self.duration = duration;
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Idle → Active. Returns `false` without touching anything when the
    /// action is already running or still locked from its previous run.
    pub fn try_start(&mut self, now: Duration) -> bool {
        if self.active || self.locked {
            return false;
        }
        self.started_at = Some(now);
        self.active = true;
        self.locked = true;
        self.trigger_held = true;
        self.committed = false;
        true
    }

    /// Whether the play-out is still running at `now`. Querying past expiry
    /// moves the action back to Idle and applies the cooldown policy.
    pub fn is_active(&mut self, now: Duration) -> bool {
        if !self.active {
            return false;
        }
        if self.elapsed(now) < self.duration {
            return true;
        }
        self.active = false;
        match self.policy {
            CooldownPolicy::ExpiryGated => self.locked = false,
            CooldownPolicy::ReleaseGated => {
                if !self.trigger_held {
                    self.locked = false;
                }
            }
        }
        false
    }

    /// Read-only variant of [`is_active`](Self::is_active); no state change.
    pub fn peek_active(&self, now: Duration) -> bool {
        self.active && self.elapsed(now) < self.duration
    }

    /// Whether [`try_start`](Self::try_start) would succeed at `now`.
    pub fn can_start(&mut self, now: Duration) -> bool {
        !self.is_active(now) && !self.locked
    }

    /// The trigger key went up.
    pub fn release(&mut self) {
        self.trigger_held = false;
        if !self.active {
            self.locked = false;
        }
    }

    /// Fraction of the last run that has elapsed, in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.started_at.is_none() {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed(now).as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Started, and its completion effect has not been applied yet.
    pub fn is_pending(&self) -> bool {
        self.started_at.is_some() && !self.committed
    }

    /// The run has reached 100 % and its completion effect is still owed.
    pub fn needs_commit(&self, now: Duration) -> bool {
        self.is_pending() && self.progress(now) >= 1.0
    }

    pub fn commit(&mut self) {
        self.committed = true;
    }

    fn elapsed(&self, now: Duration) -> Duration {
        self.started_at
            .map(|t| now.saturating_sub(t))
            .unwrap_or_default()
    }
}

/// Snapshot of the gesture slots taken once per evaluation, so the pure
/// resolver never has to mutate timers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionView {
    active: [bool; ActionKind::COUNT],
    startable: [bool; ActionKind::COUNT],
    pub turn180_pending: bool,
}

impl ActionView {
    pub fn is_active(&self, kind: ActionKind) -> bool {
        self.active[kind.index()]
    }

    pub fn can_start(&self, kind: ActionKind) -> bool {
        self.startable[kind.index()]
    }

    pub fn with_active(mut self, kind: ActionKind) -> Self {
        self.active[kind.index()] = true;
        self.startable[kind.index()] = false;
        self
    }

    pub fn with_startable(mut self, kind: ActionKind) -> Self {
        self.startable[kind.index()] = true;
        self
    }

    /// Every gesture idle and unlocked.
    pub fn all_startable() -> Self {
        Self {
            startable: [true; ActionKind::COUNT],
            ..Self::default()
        }
    }
}

/// One [`TimedAction`] per gesture kind. Attached to the character entity.
#[derive(Clone, Debug)]
pub struct ActionSet {
    actions: [TimedAction; ActionKind::COUNT],
}

impl ActionSet {
    pub fn new(timing: &TimingConfig) -> Self {
        let actions = [
            TimedAction::new(ActionKind::Jump, timing.jump_standing()),
            TimedAction::new(ActionKind::Victory, timing.victory()),
            TimedAction::new(ActionKind::Turn180, timing.turn180()),
            TimedAction::new(ActionKind::TurnLeft, timing.turn()),
            TimedAction::new(ActionKind::TurnRight, timing.turn()),
        ];
        debug_assert!(actions.iter().enumerate().all(|(i, a)| a.kind.index() == i));
        Self { actions }
    }

    pub fn get(&self, kind: ActionKind) -> &TimedAction {
        &self.actions[kind.index()]
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> &mut TimedAction {
        &mut self.actions[kind.index()]
    }

    pub fn is_active(&mut self, kind: ActionKind, now: Duration) -> bool {
        self.get_mut(kind).is_active(now)
    }

    pub fn progress(&self, kind: ActionKind, now: Duration) -> f32 {
        self.get(kind).progress(now)
    }

    /// Start `kind`, optionally with a one-off duration for this run.
    pub fn start(&mut self, kind: ActionKind, now: Duration, duration: Option<Duration>) -> bool {
        let action = self.get_mut(kind);
        if !action.can_start(now) {
            return false;
        }
        if let Some(d) = duration {
            action.set_duration(d);
        }
        action.try_start(now)
    }

    /// Report released trigger keys so release-gated locks can clear.
    pub fn release_unheld(&mut self, keys: &Keys) {
        for action in &mut self.actions {
            if !keys.is_held(action.kind.trigger()) {
                action.release();
            }
        }
    }

    /// Expire finished runs and snapshot the result.
    pub fn view(&mut self, now: Duration) -> ActionView {
        let mut view = ActionView::default();
        for action in &mut self.actions {
            let i = action.kind.index();
            view.active[i] = action.is_active(now);
            view.startable[i] = !view.active[i] && !action.locked;
        }
        view.turn180_pending = self.get(ActionKind::Turn180).is_pending();
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn second_start_is_a_no_op() {
        let mut jump = TimedAction::new(ActionKind::Jump, ms(833));
        assert!(jump.try_start(ms(0)));
        assert!(!jump.try_start(ms(10)));
        assert!(jump.is_active(ms(832)));
        assert!(!jump.is_active(ms(833)));
        assert!(!jump.is_locked());
        assert!(jump.try_start(ms(900)));
    }

    #[test]
    fn release_gated_stays_locked_until_key_up() {
        let mut turn = TimedAction::new(ActionKind::Turn180, ms(833));
        assert!(turn.try_start(ms(0)));
        assert!(!turn.is_active(ms(1000)));
        assert!(turn.is_locked());
        assert!(!turn.try_start(ms(1100)));
        turn.release();
        assert!(turn.try_start(ms(1200)));
    }

    #[test]
    fn release_during_run_unlocks_at_expiry() {
        let mut turn = TimedAction::new(ActionKind::TurnLeft, ms(500));
        turn.try_start(ms(0));
        turn.release();
        assert!(turn.is_locked());
        assert!(!turn.is_active(ms(500)));
        assert!(!turn.is_locked());
    }

    #[test]
    fn progress_is_clamped() {
        let mut turn = TimedAction::new(ActionKind::Turn180, ms(800));
        assert_eq!(turn.progress(ms(5)), 0.0);
        turn.try_start(ms(100));
        assert_eq!(turn.progress(ms(100)), 0.0);
        assert!((turn.progress(ms(500)) - 0.5).abs() < 1e-6);
        assert_eq!(turn.progress(ms(5000)), 1.0);
    }

    #[test]
    fn commit_happens_once() {
        let mut turn = TimedAction::new(ActionKind::Turn180, ms(800));
        turn.try_start(ms(0));
        assert!(!turn.needs_commit(ms(799)));
        assert!(turn.needs_commit(ms(800)));
        turn.commit();
        assert!(!turn.needs_commit(ms(2000)));
        assert!(!turn.is_pending());
    }

    #[test]
    fn set_start_overrides_duration() {
        let mut set = ActionSet::new(&TimingConfig::default());
        assert!(set.start(ActionKind::Jump, ms(0), Some(ms(833))));
        assert_eq!(set.get(ActionKind::Jump).duration(), ms(833));
        assert!(!set.start(ActionKind::Jump, ms(10), Some(ms(1000))));
        assert_eq!(set.get(ActionKind::Jump).duration(), ms(833));
    }

    #[test]
    fn view_reports_pending_turn() {
        let mut set = ActionSet::new(&TimingConfig::default());
        set.start(ActionKind::Turn180, ms(0), None);
        let view = set.view(ms(100));
        assert!(view.is_active(ActionKind::Turn180));
        assert!(!view.can_start(ActionKind::Turn180));
        assert!(view.turn180_pending);
        assert!(view.can_start(ActionKind::Jump));
    }
}
