use hecs::Entity;

/// Marker: this entity is the player.
pub struct Player;

/// Tracks the limb entities that make up the player's character body.
/// Attached to the player entity for direct access to limbs.
///
/// `hips` hangs off the player root; the torso and both upper legs hang off
/// the hips so a crouch lowers the whole upper body.
#[derive(Clone, Copy, Debug)]
pub struct CharacterBody {
    pub hips: Entity,
    /// Rest height of the hips above the player root.
    pub hips_height: f32,
    pub torso: Entity,
    pub head: Entity,
    pub left_upper_arm: Entity,
    pub left_forearm: Entity,
    pub right_upper_arm: Entity,
    pub right_forearm: Entity,
    pub left_upper_leg: Entity,
    pub left_lower_leg: Entity,
    pub right_upper_leg: Entity,
    pub right_lower_leg: Entity,
}
