use anyhow::Result;
use glam::{Quat, Vec3};
use hecs::{Entity, World};

use arena::components::{
    add_child, Building, CharacterBody, Checkerboard, Color, GlobalTransform, LocalTransform,
    MeshHandle,
};

use crate::renderer::mesh::{box_data, cylinder_data, frustum_data, plane_data, sphere_data};
use crate::renderer::MeshStore;

use super::layout::{BuildingSpec, Shape, TownLayout};

// ---------------------------------------------------------------------------
// Character body
// ---------------------------------------------------------------------------

/// Body proportions and joint offsets in one place. Limb meshes hang below
/// their pivot so a rotation swings them from the joint.
struct CharacterRig {
    hips_height: f32,
    hips_size: Vec3,
    torso_size: Vec3,
    torso_y: f32,
    head_radius: f32,
    head_y: f32,
    limb_width: f32,
    upper_arm_len: f32,
    forearm_len: f32,
    shoulder_x: f32,
    shoulder_y: f32,
    upper_leg_len: f32,
    lower_leg_len: f32,
    hip_x: f32,

    body_color: Vec3,
    head_color: Vec3,
    limb_color: Vec3,
}

fn default_rig() -> CharacterRig {
    CharacterRig {
        hips_height: 0.9,
        hips_size: Vec3::new(0.42, 0.16, 0.26),
        torso_size: Vec3::new(0.56, 0.62, 0.3),
        torso_y: 0.38,
        head_radius: 0.19,
        head_y: 0.52,
        limb_width: 0.13,
        upper_arm_len: 0.34,
        forearm_len: 0.32,
        shoulder_x: 0.36,
        shoulder_y: 0.26,
        upper_leg_len: 0.44,
        lower_leg_len: 0.42,
        hip_x: 0.13,

        body_color: Vec3::new(0.2, 0.35, 0.7),
        head_color: Vec3::new(0.86, 0.7, 0.58),
        limb_color: Vec3::new(0.3, 0.28, 0.3),
    }
}

fn spawn_part(
    world: &mut World,
    parent: Entity,
    local: LocalTransform,
    mesh: MeshHandle,
    color: Vec3,
) -> Result<Entity> {
    let e = world.spawn((local, GlobalTransform::default(), mesh, Color(color)));
    add_child(world, parent, e)?;
    Ok(e)
}

/// Give the player a segmented box body and record the limbs on it.
pub fn attach_body(world: &mut World, meshes: &mut MeshStore, player: Entity) -> Result<CharacterBody> {
    let rig = default_rig();
    let w = rig.limb_width;
    let limb = |len: f32| box_data(Vec3::new(w, len, w)).translated(Vec3::new(0.0, -len * 0.5, 0.0));

    let hips_mesh = meshes.add(&box_data(rig.hips_size));
    let torso_mesh = meshes.add(&frustum_data(
        rig.torso_size.x,
        rig.torso_size.z,
        rig.torso_size.x * 0.75,
        rig.torso_size.z * 0.85,
        rig.torso_size.y,
    ));
    let head_mesh = meshes.add(&sphere_data(rig.head_radius, 10, 14));
    let upper_arm_mesh = meshes.add(&limb(rig.upper_arm_len));
    let forearm_mesh = meshes.add(&limb(rig.forearm_len));
    let upper_leg_mesh = meshes.add(&limb(rig.upper_leg_len));
    let lower_leg_mesh = meshes.add(&limb(rig.lower_leg_len));

    let at = |x: f32, y: f32| LocalTransform::new(Vec3::new(x, y, 0.0));

    let hips = spawn_part(world, player, at(0.0, rig.hips_height), hips_mesh, rig.limb_color)?;
    let torso = spawn_part(world, hips, at(0.0, rig.torso_y), torso_mesh, rig.body_color)?;
    let head = spawn_part(world, torso, at(0.0, rig.head_y), head_mesh, rig.head_color)?;

    // +X is the character's left when it faces +Z.
    let left_upper_arm = spawn_part(
        world,
        torso,
        at(rig.shoulder_x, rig.shoulder_y),
        upper_arm_mesh,
        rig.body_color,
    )?;
    let left_forearm = spawn_part(
        world,
        left_upper_arm,
        at(0.0, -rig.upper_arm_len),
        forearm_mesh,
        rig.head_color,
    )?;
    let right_upper_arm = spawn_part(
        world,
        torso,
        at(-rig.shoulder_x, rig.shoulder_y),
        upper_arm_mesh,
        rig.body_color,
    )?;
    let right_forearm = spawn_part(
        world,
        right_upper_arm,
        at(0.0, -rig.upper_arm_len),
        forearm_mesh,
        rig.head_color,
    )?;

    let left_upper_leg = spawn_part(world, hips, at(rig.hip_x, 0.0), upper_leg_mesh, rig.limb_color)?;
    let left_lower_leg = spawn_part(
        world,
        left_upper_leg,
        at(0.0, -rig.upper_leg_len),
        lower_leg_mesh,
        rig.limb_color,
    )?;
    let right_upper_leg =
        spawn_part(world, hips, at(-rig.hip_x, 0.0), upper_leg_mesh, rig.limb_color)?;
    let right_lower_leg = spawn_part(
        world,
        right_upper_leg,
        at(0.0, -rig.upper_leg_len),
        lower_leg_mesh,
        rig.limb_color,
    )?;

    let body = CharacterBody {
        hips,
        hips_height: rig.hips_height,
        torso,
        head,
        left_upper_arm,
        left_forearm,
        right_upper_arm,
        right_forearm,
        left_upper_leg,
        left_lower_leg,
        right_upper_leg,
        right_lower_leg,
    };
    world.insert_one(player, body)?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// Town
// ---------------------------------------------------------------------------

/// Checkered grass square with its top face at Y=0.
pub fn spawn_ground(world: &mut World, meshes: &mut MeshStore, size: f32) -> Entity {
    let mesh = meshes.add(&plane_data(1.0));
    world.spawn((
        LocalTransform::new(Vec3::ZERO).with_scale(Vec3::new(size, 1.0, size)),
        GlobalTransform::default(),
        mesh,
        Color(Vec3::new(0.36, 0.6, 0.28)),
        Checkerboard(Vec3::new(0.32, 0.55, 0.25)),
    ))
}

fn spawn_building(world: &mut World, meshes: &mut MeshStore, spec: &BuildingSpec) -> Entity {
    let [w, h, d] = spec.size;
    let [x, y, z] = spec.position;
    let color = Vec3::from_array(spec.color);

    let body_mesh = match spec.shape {
        Shape::Box => box_data(Vec3::new(w, h, d)),
        Shape::Cylinder => cylinder_data(w.max(d) * 0.5, h, 20),
    };
    let root = world.spawn((
        LocalTransform::new(Vec3::new(x, y + h * 0.5, z))
            .with_rotation(Quat::from_rotation_y(spec.rotation_y)),
        GlobalTransform::default(),
        meshes.add(&body_mesh),
        Color(color),
        Building {
            name: spec.name.clone(),
        },
    ));

    if spec.roof {
        let roof_h = h * 0.45;
        let roof_mesh = meshes.add(&frustum_data(0.0, 0.0, w * 1.1, d * 1.1, roof_h));
        let roof = world.spawn((
            LocalTransform::new(Vec3::new(0.0, (h + roof_h) * 0.5, 0.0)),
            GlobalTransform::default(),
            roof_mesh,
            Color(Vec3::new(0.6, 0.25, 0.18)),
        ));
        if let Err(e) = add_child(world, root, roof) {
            log::warn!("roof for {} not attached: {e}", spec.name);
        }
    }
    root
}

/// Ground plus every building in the layout. Returns the number of buildings.
pub fn spawn_town(world: &mut World, meshes: &mut MeshStore, layout: &TownLayout) -> usize {
    spawn_ground(world, meshes, layout.ground_size);
    for spec in &layout.buildings {
        spawn_building(world, meshes, spec);
    }
    let count = world.query::<&Building>().iter().count();
    log::info!("town: {count} buildings, {} meshes", meshes.len());
    count
}
