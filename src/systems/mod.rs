mod animation;
mod motion;
mod transform;

pub use animation::{animation_state_system, pose_system};
pub use motion::character_motion_system;
pub use transform::transform_propagation_system;
