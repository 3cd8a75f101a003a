//! Third-person character motion and animation-state core.
//!
//! Input flows through [`engine::input::InputState`] into a throttled
//! [`animation::AnimationDirector`], then [`motion::CharacterMotion`] moves
//! the character and [`camera::FollowCamera`] trails it. Gestures that must
//! play out uninterrupted are [`timed_action::TimedAction`]s. [`game::Game`]
//! runs one tick of all of it against a `hecs` world.

pub mod animation;
pub mod camera;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod game;
pub mod motion;
pub mod pose;
pub mod scene;
pub mod systems;
pub mod timed_action;

pub use error::{Error, Result};
