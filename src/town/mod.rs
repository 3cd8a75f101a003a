pub mod layout;
pub mod prefabs;

pub use layout::TownLayout;
pub use prefabs::{attach_body, spawn_town};
