use std::time::Duration;

use crate::engine::input::Keys;
use crate::timed_action::{ActionKind, ActionView};

// ---------------------------------------------------------------------------
// Animation states
// ---------------------------------------------------------------------------

/// Every discrete animation the character can be in. Exactly one is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimState {
    Idle,
    TurnLeft,
    TurnRight,
    Turn180,
    RunForward,
    RunBack,
    StrafeLeftRun,
    StrafeRightRun,
    WalkForward,
    WalkBack,
    StrafeLeftWalk,
    StrafeRightWalk,
    JumpStanding,
    JumpMoving,
    Crouch,
    CrouchIdle,
    Victory,
}

impl AnimState {
    pub const ALL: [AnimState; 17] = [
        AnimState::Idle,
        AnimState::TurnLeft,
        AnimState::TurnRight,
        AnimState::Turn180,
        AnimState::RunForward,
        AnimState::RunBack,
        AnimState::StrafeLeftRun,
        AnimState::StrafeRightRun,
        AnimState::WalkForward,
        AnimState::WalkBack,
        AnimState::StrafeLeftWalk,
        AnimState::StrafeRightWalk,
        AnimState::JumpStanding,
        AnimState::JumpMoving,
        AnimState::Crouch,
        AnimState::CrouchIdle,
        AnimState::Victory,
    ];

    /// Name of the clip that backs this state in the character's clip library.
    pub fn clip_name(self) -> &'static str {
        match self {
            AnimState::Idle => "Idle",
            AnimState::TurnLeft => "90-degree turn left",
            AnimState::TurnRight => "90-degree turn right",
            AnimState::Turn180 => "180-degree turn",
            AnimState::RunForward => "Run",
            AnimState::RunBack => "Backward guarding run",
            AnimState::StrafeLeftRun => "Leftward guarding run",
            AnimState::StrafeRightRun => "Rightward guarding run",
            AnimState::WalkForward => "Forward guard walk",
            AnimState::WalkBack => "Forward guarding walk",
            AnimState::StrafeLeftWalk => "Leftward guarding walk",
            AnimState::StrafeRightWalk => "Rightward guarding walk",
            AnimState::JumpStanding => "Jump",
            AnimState::JumpMoving => "Jump 1",
            AnimState::Crouch => "Crouching",
            AnimState::CrouchIdle => "Crouching idle",
            AnimState::Victory => "Victory pose",
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, AnimState::JumpStanding | AnimState::JumpMoving)
    }

    pub fn is_turn(self) -> bool {
        matches!(self, AnimState::TurnLeft | AnimState::TurnRight)
    }

    /// States whose clip repeats until replaced. The rest are one-shots.
    pub fn is_looping(self) -> bool {
        !matches!(
            self,
            AnimState::Turn180
                | AnimState::JumpStanding
                | AnimState::JumpMoving
                | AnimState::Victory
        )
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Everything the resolver looks at. Built once per evaluation.
#[derive(Clone, Copy, Debug)]
pub struct ResolveCtx {
    pub keys: Keys,
    pub actions: ActionView,
    pub current: AnimState,
    pub time_in_state: Duration,
    pub turn_left_held_for: Option<Duration>,
    pub turn_right_held_for: Option<Duration>,
    pub turn_delay: Duration,
    pub turn_linger: Duration,
}

/// The state for the next interval, plus the gesture to start with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub state: AnimState,
    pub start: Option<ActionKind>,
}

impl Decision {
    fn keep(state: AnimState) -> Option<Self> {
        Some(Self { state, start: None })
    }

    fn start(state: AnimState, kind: ActionKind) -> Option<Self> {
        Some(Self {
            state,
            start: Some(kind),
        })
    }
}

type Rule = fn(&ResolveCtx) -> Option<Decision>;

/// Ordered precedence chain: the first rule that returns a decision wins.
pub const RULES: &[(&str, Rule)] = &[
    ("jump-active", jump_active),
    ("victory-active", victory_active),
    ("turn180-active", turn180_active),
    ("crouch", crouch),
    ("jump-trigger", jump_trigger),
    ("victory-trigger", victory_trigger),
    ("turn180-trigger", turn180_trigger),
    ("fixed-turn", fixed_turn),
    ("direction", direction),
    ("turn-linger", turn_linger),
    ("idle", idle),
];

/// Evaluate the rule table.
pub fn resolve(ctx: &ResolveCtx) -> Decision {
    resolve_named(ctx).1
}

/// Like [`resolve`], also returning the name of the rule that fired.
pub fn resolve_named(ctx: &ResolveCtx) -> (&'static str, Decision) {
    for (name, rule) in RULES {
        if let Some(decision) = rule(ctx) {
            return (name, decision);
        }
    }
    (
        "idle",
        Decision {
            state: AnimState::Idle,
            start: None,
        },
    )
}

fn jump_state(keys: &Keys) -> AnimState {
    if keys.moving() {
        AnimState::JumpMoving
    } else {
        AnimState::JumpStanding
    }
}

fn jump_active(ctx: &ResolveCtx) -> Option<Decision> {
    if !ctx.actions.is_active(ActionKind::Jump) {
        return None;
    }
    // The sub-state was fixed when the jump fired.
    if ctx.current.is_jump() {
        Decision::keep(ctx.current)
    } else {
        Decision::keep(jump_state(&ctx.keys))
    }
}

fn victory_active(ctx: &ResolveCtx) -> Option<Decision> {
    ctx.actions
        .is_active(ActionKind::Victory)
        .then_some(Decision {
            state: AnimState::Victory,
            start: None,
        })
}

fn turn180_active(ctx: &ResolveCtx) -> Option<Decision> {
    if ctx.actions.is_active(ActionKind::Turn180) && ctx.actions.turn180_pending {
        Decision::keep(AnimState::Turn180)
    } else {
        None
    }
}

fn crouch(ctx: &ResolveCtx) -> Option<Decision> {
    if !ctx.keys.crouch {
        return None;
    }
    if ctx.keys.moving() {
        Decision::keep(AnimState::Crouch)
    } else {
        Decision::keep(AnimState::CrouchIdle)
    }
}

fn jump_trigger(ctx: &ResolveCtx) -> Option<Decision> {
    if ctx.keys.jump && ctx.actions.can_start(ActionKind::Jump) {
        Decision::start(jump_state(&ctx.keys), ActionKind::Jump)
    } else {
        None
    }
}

fn victory_trigger(ctx: &ResolveCtx) -> Option<Decision> {
    if ctx.keys.victory && ctx.actions.can_start(ActionKind::Victory) {
        Decision::start(AnimState::Victory, ActionKind::Victory)
    } else {
        None
    }
}

fn turn180_trigger(ctx: &ResolveCtx) -> Option<Decision> {
    if ctx.keys.turn180 && ctx.actions.can_start(ActionKind::Turn180) {
        Decision::start(AnimState::Turn180, ActionKind::Turn180)
    } else {
        None
    }
}

fn fixed_turn(ctx: &ResolveCtx) -> Option<Decision> {
    let candidates = [
        (ctx.turn_left_held_for, AnimState::TurnLeft, ActionKind::TurnLeft),
        (ctx.turn_right_held_for, AnimState::TurnRight, ActionKind::TurnRight),
    ];
    for (held_for, state, kind) in candidates {
        let Some(held_for) = held_for else { continue };
        // A tap shorter than the delay only rotates, it never shows the clip.
        if held_for < ctx.turn_delay {
            continue;
        }
        if ctx.actions.can_start(kind) {
            return Decision::start(state, kind);
        }
        return Decision::keep(state);
    }
    None
}

fn direction(ctx: &ResolveCtx) -> Option<Decision> {
    let k = &ctx.keys;
    let run = k.run;
    let pick = |running: AnimState, walking: AnimState| if run { running } else { walking };

    let lateral = if k.left {
        Some(pick(AnimState::StrafeLeftRun, AnimState::StrafeLeftWalk))
    } else if k.right {
        Some(pick(AnimState::StrafeRightRun, AnimState::StrafeRightWalk))
    } else {
        None
    };

    // Diagonals show the strafe clip of their lateral side.
    if let Some(strafe) = lateral {
        return Decision::keep(strafe);
    }
    if k.forward {
        return Decision::keep(pick(AnimState::RunForward, AnimState::WalkForward));
    }
    if k.backward {
        return Decision::keep(pick(AnimState::RunBack, AnimState::WalkBack));
    }
    None
}

fn turn_linger(ctx: &ResolveCtx) -> Option<Decision> {
    if ctx.current.is_turn() && ctx.time_in_state < ctx.turn_linger {
        Decision::keep(ctx.current)
    } else {
        None
    }
}

fn idle(_ctx: &ResolveCtx) -> Option<Decision> {
    Decision::keep(AnimState::Idle)
}
