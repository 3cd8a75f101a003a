use std::collections::VecDeque;

use glam::Mat4;
use hecs::{Entity, World};

use crate::components::{Children, GlobalTransform, LocalTransform, Parent};

/// Propagates LocalTransform down the hierarchy via BFS.
/// Roots (entities with LocalTransform but no Parent) take their own matrix;
/// children get the parent's GlobalTransform times their LocalTransform.
pub fn transform_propagation_system(world: &mut World) {
    let mut queue: VecDeque<(Entity, Mat4)> = VecDeque::new();

    let roots: Vec<(Entity, Mat4)> = world
        .query::<&LocalTransform>()
        .without::<&Parent>()
        .iter()
        .map(|(entity, local)| (entity, local.matrix()))
        .collect();

    for (entity, global_mat) in &roots {
        if let Ok(mut gt) = world.get::<&mut GlobalTransform>(*entity) {
            gt.0 = *global_mat;
        }
        if let Ok(children) = world.get::<&Children>(*entity) {
            for &child in &children.0 {
                queue.push_back((child, *global_mat));
            }
        }
    }

    while let Some((entity, parent_global)) = queue.pop_front() {
        let child_global = match world.get::<&LocalTransform>(entity) {
            Ok(local) => parent_global * local.matrix(),
            Err(_) => parent_global,
        };

        if let Ok(mut gt) = world.get::<&mut GlobalTransform>(entity) {
            gt.0 = child_global;
        }

        if let Ok(children) = world.get::<&Children>(entity) {
            for &child in &children.0 {
                queue.push_back((child, child_global));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::components::add_child;

    #[test]
    fn child_inherits_parent_translation() {
        let mut world = World::new();
        let parent = world.spawn((
            LocalTransform::new(Vec3::new(1.0, 0.0, 2.0)),
            GlobalTransform::default(),
        ));
        let child = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 1.0, 0.0)),
            GlobalTransform::default(),
        ));
        add_child(&mut world, parent, child).unwrap();

        transform_propagation_system(&mut world);

        let gt = world.get::<&GlobalTransform>(child).unwrap();
        let p = gt.0.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 1.0, 2.0)).length() < 1e-6);
    }
}
