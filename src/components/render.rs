use glam::Vec3;

/// Index into the renderer's mesh store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshHandle(pub usize);

/// RGB color applied to an entity for rendering.
#[derive(Clone, Copy, Debug)]
pub struct Color(pub Vec3);

/// Checkerboard pattern using primary Color and this secondary color.
pub struct Checkerboard(pub Vec3);

/// A placed town building, kept for logging and the controls overlay.
pub struct Building {
    pub name: String,
}
