use std::f32::consts::PI;
use std::time::Duration;

use arena::animation::AnimState;
use arena::config::Config;
use arena::engine::input::{Action, InputState};
use arena::game::Game;
use arena::timed_action::ActionKind;

const EPS: f32 = 1e-5;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn setup() -> (Game, InputState) {
    let config = Config::default();
    let input = InputState::new(config.timing.debounce());
    (Game::new(config), input)
}

#[test]
fn one_tick_forward_walks_one_step() {
    let (mut game, mut input) = setup();
    input.set_key(Action::Forward, true, ms(0));
    game.tick(&mut input, ms(16), 0.016);

    assert_eq!(game.state(), AnimState::WalkForward);
    let t = game.transform();
    assert!((t.z - 0.035).abs() < EPS, "z = {}", t.z);
    assert!(t.x.abs() < EPS);
}

#[test]
fn shift_runs() {
    let (mut game, mut input) = setup();
    input.set_key(Action::Forward, true, ms(0));
    input.set_key(Action::Run, true, ms(0));
    game.tick(&mut input, ms(16), 0.016);

    assert_eq!(game.state(), AnimState::RunForward);
    assert!((game.transform().z - 0.06).abs() < EPS);
}

#[test]
fn moving_jump_plays_out_and_unlocks() {
    let (mut game, mut input) = setup();
    input.set_key(Action::Forward, true, ms(0));
    input.set_key(Action::Jump, true, ms(0));
    game.tick(&mut input, ms(16), 0.016);

    assert_eq!(game.state(), AnimState::JumpMoving);
    {
        let actions = game.actions().unwrap();
        assert_eq!(actions.get(ActionKind::Jump).duration(), ms(833));
    }

    input.set_key(Action::Jump, false, ms(100));
    game.tick(&mut input, ms(16 + 416), 0.016);
    assert!(game.transform().y > Config::default().motion.base_y + 0.4);
    assert_eq!(game.state(), AnimState::JumpMoving);

    let mut actions = game.actions_mut().unwrap();
    assert!(!actions.is_active(ActionKind::Jump, ms(16 + 834)));
    assert!(!actions.get(ActionKind::Jump).is_locked());
}

#[test]
fn standing_jump_lasts_a_second() {
    let (mut game, mut input) = setup();
    input.set_key(Action::Jump, true, ms(0));
    game.tick(&mut input, ms(16), 0.016);

    assert_eq!(game.state(), AnimState::JumpStanding);
    let actions = game.actions().unwrap();
    assert_eq!(actions.get(ActionKind::Jump).duration(), ms(1000));
}

#[test]
fn turn180_flips_yaw_once() {
    let (mut game, mut input) = setup();
    input.set_key(Action::Turn180, true, ms(0));
    game.tick(&mut input, ms(16), 0.016);
    assert_eq!(game.state(), AnimState::Turn180);
    input.set_key(Action::Turn180, false, ms(40));

    // Walking is ignored while the turn is in flight.
    input.set_key(Action::Forward, true, ms(200));
    game.tick(&mut input, ms(400), 0.016);
    assert_eq!(game.transform().z, 0.0);
    input.set_key(Action::Forward, false, ms(500));

    game.tick(&mut input, ms(900), 0.016);
    assert!((game.transform().yaw - PI).abs() < EPS);
    game.tick(&mut input, ms(1000), 0.016);
    assert!((game.transform().yaw - PI).abs() < EPS);
}

#[test]
fn victory_freezes_movement() {
    let (mut game, mut input) = setup();
    input.set_key(Action::Victory, true, ms(0));
    game.tick(&mut input, ms(16), 0.016);
    assert_eq!(game.state(), AnimState::Victory);

    input.set_key(Action::Forward, true, ms(100));
    game.tick(&mut input, ms(200), 0.016);
    assert_eq!(game.transform().z, 0.0);
    assert_eq!(game.state(), AnimState::Victory);
}

#[test]
fn crouch_blocks_motion_and_picks_crouch_clip() {
    let (mut game, mut input) = setup();
    input.set_key(Action::Crouch, true, ms(0));
    input.set_key(Action::Forward, true, ms(0));
    game.tick(&mut input, ms(16), 0.016);

    assert_eq!(game.state(), AnimState::Crouch);
    assert_eq!(game.transform().z, 0.0);
}

#[test]
fn forward_and_back_later_press_wins() {
    let (mut game, mut input) = setup();
    input.set_key(Action::Forward, true, ms(0));
    input.set_key(Action::Backward, true, ms(5));
    game.tick(&mut input, ms(16), 0.016);

    assert_eq!(game.state(), AnimState::WalkBack);
    assert!((game.transform().z + 0.035).abs() < EPS);
}

#[test]
fn camera_trails_behind_player() {
    let (mut game, mut input) = setup();
    game.tick(&mut input, ms(16), 0.016);
    // Yaw 0 faces +Z, so the camera sits on the -Z side.
    assert!(game.camera.position.z < 0.0);
    assert!(game.camera.position.y > 0.0);
}
