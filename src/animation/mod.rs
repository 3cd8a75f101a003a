pub mod debug;
mod director;
pub mod resolver;

pub use debug::ClipBrowser;
pub use director::AnimationDirector;
pub use resolver::{resolve, AnimState, Decision, ResolveCtx};
