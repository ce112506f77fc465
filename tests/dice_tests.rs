//! Tests for the floating dice lifecycle

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use floating_dice::dice_tray::*;

fn spawn_test_die(world: &mut World, position: Vec3) -> Entity {
    let die = world
        .spawn((
            Die::new(1.0, position.y, 0.0),
            Transform::from_translation(position),
            Velocity::zero(),
            RigidBody::KinematicPositionBased,
        ))
        .id();
    world.resource_mut::<DiceTable>().register_die(die);
    die
}

fn test_world(count: usize) -> (World, Vec<Entity>) {
    let mut world = World::new();
    let settings = TableSettings::default();
    world.insert_resource(settings.clone());
    world.insert_resource(TableRng::new(Some(7)));
    world.init_resource::<DiceTable>();
    world.init_resource::<GestureController>();

    let dice = (0..count)
        .map(|i| {
            let position = float_position(i, count, &settings);
            spawn_test_die(&mut world, position)
        })
        .collect();
    (world, dice)
}

fn run_action(world: &mut World, action: TrayAction) {
    world
        .run_system_once(
            move |settings: Res<TableSettings>,
                  table: Res<DiceTable>,
                  mut controller: ResMut<GestureController>,
                  mut rng: ResMut<TableRng>,
                  mut dice: DiceBodies| {
                apply_tray_action(
                    action,
                    &settings,
                    &table,
                    &mut controller,
                    &mut rng.0,
                    &mut dice,
                );
            },
        )
        .expect("action system runs");
}

#[test]
fn test_identity_reads_three() {
    assert_eq!(face_value(Quat::IDENTITY), 3);
}

#[test]
fn test_every_face_can_point_up() {
    let rotations = [
        (Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), 1),
        (Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2), 2),
        (Quat::from_rotation_x(std::f32::consts::PI), 4),
        (Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2), 5),
        (Quat::from_rotation_x(std::f32::consts::FRAC_PI_2), 6),
    ];
    for (rotation, expected) in rotations {
        assert_eq!(face_value(rotation), expected, "rotation {:?}", rotation);
    }
}

#[test]
fn test_gather_slots_spread_around_aim_point() {
    let count = 4;
    let offsets: Vec<Vec2> = (0..count).map(|i| gather_offset(i, count)).collect();
    let centre: Vec2 = offsets.iter().copied().sum::<Vec2>() / count as f32;
    assert!(centre.length() < 1e-4);

    for (i, a) in offsets.iter().enumerate() {
        for b in offsets.iter().skip(i + 1) {
            assert!(a.distance(*b) > 0.5);
        }
    }
}

#[test]
fn test_throw_impulse_is_bounded() {
    let settings = GestureSettings::default();

    // A very fast flick saturates
    let fast = throw_impulse(Vec2::new(5000.0, 0.0), 1.0, &settings);
    assert!(fast.x <= settings.max_throw + 1e-4);
    assert!(fast.y >= settings.min_lift);

    // A click without movement still lifts off
    let still = throw_impulse(Vec2::ZERO, 500.0, &settings);
    assert_eq!(still.x, 0.0);
    assert_eq!(still.z, 0.0);
    assert_eq!(still.y, settings.min_lift);

    // Downward drag on screen throws toward +Z
    let down = throw_impulse(Vec2::new(0.0, 300.0), 200.0, &settings);
    assert!(down.z > 0.0);
}

#[test]
fn test_gesture_finish_returns_targets_in_order() {
    let mut world = World::new();
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();

    let settings = GestureSettings::default();
    let mut controller = GestureController::default();
    assert!(controller.begin(Vec2::new(100.0, 100.0), 0.0, vec![a, b]));
    controller.track(Vec2::new(300.0, 100.0), 1.0);

    let (targets, impulse) = controller.finish(100.0, &settings).expect("session");
    assert_eq!(targets, vec![a, b]);
    assert!(impulse.x > 0.0);
    assert!(!controller.is_active());
}

#[test]
fn test_toss_keeps_selected_dice() {
    let (mut world, dice) = test_world(6);
    let kept = dice[2];
    let kept_position = world.get::<Transform>(kept).map(|t| t.translation);
    world
        .get_mut::<Die>(kept)
        .expect("die")
        .toggle_selection();

    run_action(&mut world, TrayAction::TossUnselected);

    for &entity in &dice {
        let rigid_body = *world.get::<RigidBody>(entity).expect("body");
        if entity == kept {
            assert_eq!(rigid_body, RigidBody::KinematicPositionBased);
            assert_eq!(world.get::<Transform>(entity).map(|t| t.translation), kept_position);
            assert!(world.get::<Die>(entity).expect("die").selected);
        } else {
            assert_eq!(rigid_body, RigidBody::Dynamic);
            let die = world.get::<Die>(entity).expect("die");
            assert_eq!(die.mode(), PhysicsMode::DynamicRolling);
        }
    }
}

#[test]
fn test_throw_all_then_reset_all() {
    let (mut world, dice) = test_world(3);
    let settings = TableSettings::default();

    run_action(&mut world, TrayAction::ThrowAll);
    for &entity in &dice {
        assert_eq!(*world.get::<RigidBody>(entity).expect("body"), RigidBody::Dynamic);
        let velocity = world.get::<Velocity>(entity).expect("velocity");
        assert!(velocity.linvel.y >= settings.gesture.min_lift - settings.dice.throw_jitter);
    }

    run_action(&mut world, TrayAction::ResetAll);
    for (index, &entity) in dice.iter().enumerate() {
        assert_eq!(
            *world.get::<RigidBody>(entity).expect("body"),
            RigidBody::KinematicPositionBased
        );
        let die = world.get::<Die>(entity).expect("die");
        assert!(die.is_floating());
        assert!(!die.selected);
        assert_eq!(
            world.get::<Transform>(entity).map(|t| t.translation),
            Some(float_position(index, dice.len(), &settings))
        );
        assert_eq!(*world.get::<Velocity>(entity).expect("velocity"), Velocity::zero());
    }
}

#[test]
fn test_roll_unselected_refloats_only_unselected() {
    let (mut world, dice) = test_world(2);
    run_action(&mut world, TrayAction::TossUnselected);

    world
        .get_mut::<Die>(dice[0])
        .expect("die")
        .toggle_selection();
    run_action(&mut world, TrayAction::RollUnselected);

    assert_eq!(*world.get::<RigidBody>(dice[0]).expect("body"), RigidBody::Dynamic);
    assert!(world.get::<Die>(dice[0]).expect("die").selected);
    assert_eq!(
        *world.get::<RigidBody>(dice[1]).expect("body"),
        RigidBody::KinematicPositionBased
    );
}

#[test]
fn test_actions_cancel_gesture() {
    let (mut world, dice) = test_world(2);
    world
        .resource_mut::<GestureController>()
        .begin(Vec2::ZERO, 0.0, dice.clone());

    run_action(&mut world, TrayAction::ResetAll);
    assert!(!world.resource::<GestureController>().is_active());
}

#[test]
fn test_status_after_settling() {
    let snapshots = [
        DieSnapshot::new(DieState::Settled, true, 6),
        DieSnapshot::new(DieState::Settled, false, 2),
        DieSnapshot::new(DieState::Floating, false, 4),
    ];
    let text = describe_table(&snapshots, false);
    assert!(text.contains("Kept: 6 (total 6)"));
    assert!(text.contains("Available: 2"));
    assert!(text.contains("Floating: 1"));
    assert!(text.ends_with(TablePhase::Floating.instructions()));
}

#[test]
fn test_seeded_rolls_repeat() {
    let settings = DiceSettings::default();
    let roll_once = || {
        let mut rng = StdRng::seed_from_u64(99);
        let mut die = Die::new(1.0, 0.0, 0.0);
        let mut transform = Transform::default();
        let mut velocity = Velocity::zero();
        let mut rigid_body = RigidBody::KinematicPositionBased;
        die.roll(
            &mut DieBody::new(&mut transform, &mut velocity, &mut rigid_body),
            &settings,
            &mut rng,
        );
        (transform.translation, velocity.linvel)
    };
    assert_eq!(roll_once(), roll_once());
}
