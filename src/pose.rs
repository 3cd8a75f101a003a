use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use glam::Quat;

use crate::animation::AnimState;

// ---------------------------------------------------------------------------
// Bone pose
// ---------------------------------------------------------------------------

/// A snapshot of all bone orientations, used for sampling and cross-fading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BonePose {
    /// How far the hips sink below their rest height (crouch, landing).
    pub hips_drop: f32,
    pub torso_rot: Quat,
    pub head_rot: Quat,
    pub left_upper_arm_rot: Quat,
    pub left_forearm_rot: Quat,
    pub right_upper_arm_rot: Quat,
    pub right_forearm_rot: Quat,
    pub left_upper_leg_rot: Quat,
    pub left_lower_leg_rot: Quat,
    pub right_upper_leg_rot: Quat,
    pub right_lower_leg_rot: Quat,
}

const SHOULDER_ANGLE: f32 = 0.14; // radians; matches the arm splay of the body prefab

pub fn rest_pose() -> BonePose {
    BonePose {
        hips_drop: 0.0,
        torso_rot: Quat::IDENTITY,
        head_rot: Quat::IDENTITY,
        left_upper_arm_rot: Quat::from_rotation_z(SHOULDER_ANGLE),
        left_forearm_rot: Quat::IDENTITY,
        right_upper_arm_rot: Quat::from_rotation_z(-SHOULDER_ANGLE),
        right_forearm_rot: Quat::IDENTITY,
        left_upper_leg_rot: Quat::IDENTITY,
        left_lower_leg_rot: Quat::IDENTITY,
        right_upper_leg_rot: Quat::IDENTITY,
        right_lower_leg_rot: Quat::IDENTITY,
    }
}

pub fn blend_pose(a: &BonePose, b: &BonePose, t: f32) -> BonePose {
    BonePose {
        hips_drop: a.hips_drop + (b.hips_drop - a.hips_drop) * t,
        torso_rot: a.torso_rot.slerp(b.torso_rot, t),
        head_rot: a.head_rot.slerp(b.head_rot, t),
        left_upper_arm_rot: a.left_upper_arm_rot.slerp(b.left_upper_arm_rot, t),
        left_forearm_rot: a.left_forearm_rot.slerp(b.left_forearm_rot, t),
        right_upper_arm_rot: a.right_upper_arm_rot.slerp(b.right_upper_arm_rot, t),
        right_forearm_rot: a.right_forearm_rot.slerp(b.right_forearm_rot, t),
        left_upper_leg_rot: a.left_upper_leg_rot.slerp(b.left_upper_leg_rot, t),
        left_lower_leg_rot: a.left_lower_leg_rot.slerp(b.left_lower_leg_rot, t),
        right_upper_leg_rot: a.right_upper_leg_rot.slerp(b.right_upper_leg_rot, t),
        right_lower_leg_rot: a.right_lower_leg_rot.slerp(b.right_lower_leg_rot, t),
    }
}

// ---------------------------------------------------------------------------
// Procedural clips
// ---------------------------------------------------------------------------
//
// Looping clips are sampled with seconds since the clip started, one-shots
// with normalised progress in [0, 1].

#[derive(Clone, Copy)]
enum Gait {
    Walk,
    Run,
}

#[derive(Clone, Copy)]
enum Heading {
    Forward,
    Back,
    Left,
    Right,
}

fn idle(t: f32) -> BonePose {
    let rest = rest_pose();
    let sway = (t * TAU * 0.3).sin() * 0.04;
    BonePose {
        left_upper_arm_rot: rest.left_upper_arm_rot * Quat::from_rotation_x(-sway),
        right_upper_arm_rot: rest.right_upper_arm_rot * Quat::from_rotation_x(sway),
        ..rest
    }
}

fn stride(t: f32, gait: Gait, heading: Heading) -> BonePose {
    let rest = rest_pose();
    let (freq, leg_amp, lean) = match gait {
        Gait::Walk => (1.6, 0.38, 0.0),
        Gait::Run => (2.6, 0.6, 0.12),
    };
    let phase = t * TAU * freq;
    let s = phase.sin();
    let arm_amp = leg_amp * 0.45;

    // Guarded strafes swing the legs sideways and keep the arms up.
    let (leg_l, leg_r, torso) = match heading {
        Heading::Forward => (
            Quat::from_rotation_x(leg_amp * s),
            Quat::from_rotation_x(-leg_amp * s),
            Quat::from_rotation_x(lean),
        ),
        Heading::Back => (
            Quat::from_rotation_x(-leg_amp * s),
            Quat::from_rotation_x(leg_amp * s),
            Quat::from_rotation_x(-lean * 0.5),
        ),
        Heading::Left | Heading::Right => {
            let side = if matches!(heading, Heading::Left) { 1.0 } else { -1.0 };
            (
                Quat::from_rotation_z(side * leg_amp * 0.5 * s.max(0.0)),
                Quat::from_rotation_z(side * leg_amp * 0.5 * (-s).max(0.0)),
                Quat::from_rotation_z(-side * lean),
            )
        }
    };
    let left_knee = (-s).max(0.0) * leg_amp * 0.7;
    let right_knee = s.max(0.0) * leg_amp * 0.7;

    BonePose {
        torso_rot: torso,
        head_rot: Quat::from_rotation_z(phase.cos() * 0.025),
        left_upper_arm_rot: rest.left_upper_arm_rot * Quat::from_rotation_x(-arm_amp * s),
        left_forearm_rot: Quat::from_rotation_x(-arm_amp * 0.5),
        right_upper_arm_rot: rest.right_upper_arm_rot * Quat::from_rotation_x(arm_amp * s),
        right_forearm_rot: Quat::from_rotation_x(-arm_amp * 0.5),
        left_upper_leg_rot: leg_l,
        left_lower_leg_rot: Quat::from_rotation_x(-left_knee),
        right_upper_leg_rot: leg_r,
        right_lower_leg_rot: Quat::from_rotation_x(-right_knee),
        ..rest
    }
}

fn turn_step(t: f32, side: f32) -> BonePose {
    let rest = rest_pose();
    let s = (t * TAU * 1.2).sin();
    BonePose {
        torso_rot: Quat::from_rotation_y(side * 0.15),
        head_rot: Quat::from_rotation_y(side * 0.25),
        left_upper_leg_rot: Quat::from_rotation_x(0.2 * s.max(0.0)),
        right_upper_leg_rot: Quat::from_rotation_x(0.2 * (-s).max(0.0)),
        ..rest
    }
}

fn turn180(p: f32) -> BonePose {
    let rest = rest_pose();
    let swing = (p * PI).sin();
    BonePose {
        torso_rot: Quat::from_rotation_y(swing * 0.4),
        head_rot: Quat::from_rotation_y(swing * 0.3),
        left_upper_leg_rot: Quat::from_rotation_x(swing * 0.3),
        right_upper_leg_rot: Quat::from_rotation_x(-swing * 0.2),
        left_lower_leg_rot: Quat::from_rotation_x(-swing * 0.3),
        ..rest
    }
}

fn jump(p: f32) -> BonePose {
    let rest = rest_pose();
    // Crouch to take off, tuck at the apex, absorb on landing.
    let tuck = (p * PI).sin();
    let load = (1.0 - p * 6.0).max(0.0) + (p * 6.0 - 5.0).max(0.0);
    BonePose {
        hips_drop: load * 0.15,
        left_upper_arm_rot: rest.left_upper_arm_rot * Quat::from_rotation_x(-0.35 - tuck * 0.6),
        right_upper_arm_rot: rest.right_upper_arm_rot * Quat::from_rotation_x(-0.35 - tuck * 0.6),
        left_forearm_rot: Quat::from_rotation_x(-0.25),
        right_forearm_rot: Quat::from_rotation_x(-0.25),
        left_upper_leg_rot: Quat::from_rotation_x(-0.25 - tuck * 0.3),
        right_upper_leg_rot: Quat::from_rotation_x(-0.25 - tuck * 0.3),
        left_lower_leg_rot: Quat::from_rotation_x(-0.35 - tuck * 0.4),
        right_lower_leg_rot: Quat::from_rotation_x(-0.35 - tuck * 0.4),
        ..rest
    }
}

fn jump_moving(p: f32) -> BonePose {
    let rest = rest_pose();
    let split = (p * PI).sin() * 0.6;
    BonePose {
        torso_rot: Quat::from_rotation_x(0.1),
        left_upper_arm_rot: rest.left_upper_arm_rot * Quat::from_rotation_x(split * 0.5),
        right_upper_arm_rot: rest.right_upper_arm_rot * Quat::from_rotation_x(-split * 0.5),
        left_upper_leg_rot: Quat::from_rotation_x(-split),
        right_upper_leg_rot: Quat::from_rotation_x(split * 0.6),
        right_lower_leg_rot: Quat::from_rotation_x(-split),
        ..rest
    }
}

fn crouched(rest: BonePose) -> BonePose {
    BonePose {
        hips_drop: 0.35,
        torso_rot: Quat::from_rotation_x(0.3),
        left_upper_leg_rot: Quat::from_rotation_x(-0.9),
        right_upper_leg_rot: Quat::from_rotation_x(-0.9),
        left_lower_leg_rot: Quat::from_rotation_x(1.4),
        right_lower_leg_rot: Quat::from_rotation_x(1.4),
        ..rest
    }
}

fn crouch_idle(t: f32) -> BonePose {
    let base = crouched(idle(t));
    BonePose {
        hips_drop: base.hips_drop + (t * TAU * 0.3).sin() * 0.01,
        ..base
    }
}

fn crouch_walk(t: f32) -> BonePose {
    let base = crouched(rest_pose());
    let s = (t * TAU * 1.2).sin();
    BonePose {
        left_upper_leg_rot: base.left_upper_leg_rot * Quat::from_rotation_x(0.25 * s),
        right_upper_leg_rot: base.right_upper_leg_rot * Quat::from_rotation_x(-0.25 * s),
        ..base
    }
}

fn victory(p: f32) -> BonePose {
    let rest = rest_pose();
    // Arms go up in the first fifth and stay there.
    let raise = (p * 5.0).min(1.0);
    BonePose {
        head_rot: Quat::from_rotation_x(-0.2 * raise),
        left_upper_arm_rot: Quat::from_rotation_z(SHOULDER_ANGLE + raise * 2.6),
        right_upper_arm_rot: Quat::from_rotation_z(-SHOULDER_ANGLE - raise * 2.6),
        left_forearm_rot: Quat::from_rotation_z(raise * 0.3),
        right_forearm_rot: Quat::from_rotation_z(-raise * 0.3),
        ..rest
    }
}

/// One entry of the clip library.
#[derive(Clone, Copy)]
pub struct Clip {
    sample: fn(f32) -> BonePose,
    /// Seconds; one-shots hold their last frame once this has elapsed.
    pub length: f32,
    pub looping: bool,
}

impl Clip {
    pub fn looping(sample: fn(f32) -> BonePose) -> Self {
        Self {
            sample,
            length: 1.0,
            looping: true,
        }
    }

    pub fn one_shot(sample: fn(f32) -> BonePose, length: f32) -> Self {
        Self {
            sample,
            length,
            looping: false,
        }
    }

    pub fn sample(&self, t: f32) -> BonePose {
        if self.looping {
            (self.sample)(t)
        } else if self.length <= 0.0 {
            (self.sample)(1.0)
        } else {
            (self.sample)((t / self.length).clamp(0.0, 1.0))
        }
    }

    fn for_state(state: AnimState) -> Self {
        match state {
            AnimState::Idle => Clip::looping(idle),
            AnimState::TurnLeft => Clip::looping(|t| turn_step(t, 1.0)),
            AnimState::TurnRight => Clip::looping(|t| turn_step(t, -1.0)),
            AnimState::Turn180 => Clip::one_shot(turn180, 0.833),
            AnimState::RunForward => Clip::looping(|t| stride(t, Gait::Run, Heading::Forward)),
            AnimState::RunBack => Clip::looping(|t| stride(t, Gait::Run, Heading::Back)),
            AnimState::StrafeLeftRun => Clip::looping(|t| stride(t, Gait::Run, Heading::Left)),
            AnimState::StrafeRightRun => Clip::looping(|t| stride(t, Gait::Run, Heading::Right)),
            AnimState::WalkForward => Clip::looping(|t| stride(t, Gait::Walk, Heading::Forward)),
            AnimState::WalkBack => Clip::looping(|t| stride(t, Gait::Walk, Heading::Back)),
            AnimState::StrafeLeftWalk => Clip::looping(|t| stride(t, Gait::Walk, Heading::Left)),
            AnimState::StrafeRightWalk => {
                Clip::looping(|t| stride(t, Gait::Walk, Heading::Right))
            }
            AnimState::JumpStanding => Clip::one_shot(jump, 1.0),
            AnimState::JumpMoving => Clip::one_shot(jump_moving, 0.833),
            AnimState::Crouch => Clip::looping(crouch_walk),
            AnimState::CrouchIdle => Clip::looping(crouch_idle),
            AnimState::Victory => Clip::one_shot(victory, 3.0),
        }
    }
}

/// Named clips available on the character.
#[derive(Clone, Default)]
pub struct ClipSet {
    clips: HashMap<String, Clip>,
}

impl ClipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clip for every [`AnimState`], keyed by its clip name.
    pub fn procedural() -> Self {
        let mut set = Self::new();
        for state in AnimState::ALL {
            set.insert(state.clip_name(), Clip::for_state(state));
        }
        set
    }

    pub fn insert(&mut self, name: &str, clip: Clip) {
        self.clips.insert(name.to_string(), clip);
    }

    pub fn remove(&mut self, name: &str) -> Option<Clip> {
        self.clips.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Clip> {
        self.clips.get(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Mixer
// ---------------------------------------------------------------------------

/// Plays one clip at a time and cross-fades from the previous pose on change.
/// Attached to the player entity.
pub struct ClipMixer {
    clips: ClipSet,
    current: Option<(AnimState, Clip)>,
    time: f32,
    /// 0.0 = `blend_from`, 1.0 = current clip.
    blend: f32,
    crossfade: f32,
    blend_from: Option<BonePose>,
    pose: BonePose,
}

impl ClipMixer {
    pub fn new(clips: ClipSet, crossfade: f32) -> Self {
        Self {
            clips,
            current: None,
            time: 0.0,
            blend: 1.0,
            crossfade,
            blend_from: None,
            pose: rest_pose(),
        }
    }

    /// Start the clip for `state` from its first frame. `false` if there is none.
    pub fn play(&mut self, state: AnimState) -> bool {
        let Some(clip) = self.clips.get(state.clip_name()).copied() else {
            return false;
        };
        self.blend_from = Some(self.pose);
        self.blend = 0.0;
        self.time = 0.0;
        self.current = Some((state, clip));
        true
    }

    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
        self.blend = if self.crossfade <= 0.0 {
            1.0
        } else {
            (self.blend + dt / self.crossfade).min(1.0)
        };

        let target = match &self.current {
            Some((_, clip)) => clip.sample(self.time),
            None => rest_pose(),
        };
        self.pose = match self.blend_from {
            Some(ref from) if self.blend < 1.0 => blend_pose(from, &target, self.blend),
            _ => target,
        };
    }

    pub fn current(&self) -> Option<AnimState> {
        self.current.map(|(state, _)| state)
    }

    pub fn blend(&self) -> f32 {
        self.blend
    }

    pub fn pose(&self) -> &BonePose {
        &self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_a_procedural_clip() {
        let clips = ClipSet::procedural();
        assert_eq!(clips.len(), AnimState::ALL.len());
        for state in AnimState::ALL {
            assert!(clips.get(state.clip_name()).is_some(), "{state:?}");
        }
    }

    #[test]
    fn crossfade_reaches_target_after_fade_time() {
        let mut mixer = ClipMixer::new(ClipSet::procedural(), 0.2);
        assert!(mixer.play(AnimState::CrouchIdle));
        mixer.advance(0.1);
        assert!((mixer.blend() - 0.5).abs() < 1e-5);
        assert!(mixer.pose().hips_drop > 0.0 && mixer.pose().hips_drop < 0.35);
        mixer.advance(0.1);
        assert_eq!(mixer.blend(), 1.0);
    }

    #[test]
    fn missing_clip_is_refused() {
        let mut clips = ClipSet::procedural();
        clips.remove(AnimState::Victory.clip_name());
        let mut mixer = ClipMixer::new(clips, 0.2);
        assert!(mixer.play(AnimState::Idle));
        assert!(!mixer.play(AnimState::Victory));
        assert_eq!(mixer.current(), Some(AnimState::Idle));
    }

    #[test]
    fn clip_loop_flag_matches_state() {
        for state in AnimState::ALL {
            assert_eq!(Clip::for_state(state).looping, state.is_looping(), "{state:?}");
        }
    }

    #[test]
    fn one_shot_holds_last_frame() {
        let clip = Clip::for_state(AnimState::Victory);
        assert_eq!(clip.sample(3.0), clip.sample(10.0));
    }
}
