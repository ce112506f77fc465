//! Ray picking against the tray
//!
//! The camera turns a pointer position into a world ray. The ground plane is
//! intersected directly; dice are found by casting the ray through the rapier
//! collider set.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dice_tray::types::*;

/// Intersection of a ray with the horizontal plane `y = plane_y`.
///
/// Returns `None` when the ray runs parallel to the plane or the plane lies
/// behind the ray origin.
pub fn ray_plane_intersection(origin: Vec3, direction: Vec3, plane_y: f32) -> Option<Vec3> {
    if direction.y.abs() < 0.0001 {
        return None;
    }

    let t = (plane_y - origin.y) / direction.y;
    if t < 0.0 {
        return None;
    }

    Some(origin + direction * t)
}

/// Dice a pointer press may select: settled ones, in table order.
pub fn settled_dice(table: &DiceTable, dice: &DiceBodies, settings: &DiceSettings) -> Vec<Entity> {
    table
        .dice
        .iter()
        .copied()
        .filter(|&entity| {
            dice.get(entity).is_ok_and(|(die, _, velocity, _)| {
                die.state(velocity, settings) == DieState::Settled
            })
        })
        .collect()
}

/// Nearest collider along `ray` that belongs to one of `candidates`.
pub fn pick_die(context: &RapierContext, ray: Ray3d, candidates: &[Entity]) -> Option<Entity> {
    if candidates.is_empty() {
        return None;
    }

    let pickable = |entity: Entity| candidates.contains(&entity);
    let filter = QueryFilter::new().predicate(&pickable);
    context
        .cast_ray(ray.origin, *ray.direction, f32::MAX, true, filter)
        .map(|(entity, _)| entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn test_ray_hits_ground_plane() {
        let hit = ray_plane_intersection(Vec3::new(1.0, 15.0, 2.0), Vec3::NEG_Y, -5.0)
            .expect("straight down hits the plane");
        assert_eq!(hit, Vec3::new(1.0, -5.0, 2.0));
    }

    #[test]
    fn test_ray_parallel_or_away_misses_plane() {
        assert!(ray_plane_intersection(Vec3::ZERO, Vec3::X, -5.0).is_none());
        assert!(ray_plane_intersection(Vec3::ZERO, Vec3::Y, -5.0).is_none());
    }

    #[test]
    fn test_only_settled_dice_are_pickable() {
        let mut world = World::new();
        let mut table = DiceTable::default();

        let floating = world
            .spawn((
                Die::new(1.0, 0.0, 0.0),
                Transform::default(),
                Velocity::zero(),
                RigidBody::KinematicPositionBased,
            ))
            .id();

        let mut rolling_die = Die::new(1.0, 0.0, 0.0);
        let mut settled_die = Die::new(1.0, 0.0, 0.0);
        let mut transform = Transform::default();
        let mut velocity = Velocity::zero();
        let mut rigid_body = RigidBody::KinematicPositionBased;
        let mut body = DieBody::new(&mut transform, &mut velocity, &mut rigid_body);
        rolling_die.start_gather();
        rolling_die.throw_dice(&mut body, Vec3::Y * 5.0, &DiceSettings::default(), &mut rand::thread_rng());
        settled_die.start_gather();
        settled_die.throw_dice(&mut body, Vec3::Y * 5.0, &DiceSettings::default(), &mut rand::thread_rng());

        let rolling = world
            .spawn((
                rolling_die,
                Transform::default(),
                Velocity::linear(Vec3::new(0.0, -3.0, 0.0)),
                RigidBody::Dynamic,
            ))
            .id();
        let settled = world
            .spawn((settled_die, Transform::default(), Velocity::zero(), RigidBody::Dynamic))
            .id();

        for entity in [floating, rolling, settled] {
            table.register_die(entity);
        }
        world.insert_resource(table);

        let pickable = world
            .run_system_once(|table: Res<DiceTable>, dice: DiceBodies| {
                settled_dice(&table, &dice, &DiceSettings::default())
            })
            .expect("picking system runs");
        assert_eq!(pickable, vec![settled]);
    }
}
