use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy::render::render_resource::Face;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::dice_tray::meshes::{create_die_mesh_and_collider, create_outline_mesh, pip_positions};
use crate::dice_tray::types::*;

pub const BUTTON_IDLE: Color = Color::srgba(0.1, 0.1, 0.12, 0.85);
pub const BUTTON_HOVERED: Color = Color::srgba(0.2, 0.22, 0.28, 0.9);
pub const BUTTON_PRESSED: Color = Color::srgba(0.35, 0.3, 0.1, 0.95);

/// Apply the configured gravity to every rapier context.
pub fn configure_physics(
    settings: Res<TableSettings>,
    mut configs: Query<&mut RapierConfiguration>,
) {
    for mut config in configs.iter_mut() {
        config.gravity = Vec3::new(0.0, settings.tray.gravity, 0.0);
    }
}

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<TableSettings>,
    mut table: ResMut<DiceTable>,
    mut rng: ResMut<TableRng>,
) {
    let tray = &settings.tray;

    // Camera straight above the tray; screen up is world -Z so a drag
    // toward the bottom of the screen points along +Z.
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: tray.fov_radians(),
            ..default()
        }),
        Transform::from_xyz(0.0, tray.ground_y + tray.camera_distance, 0.0)
            .looking_at(Vec3::new(0.0, tray.ground_y, 0.0), Vec3::NEG_Z),
        MainCamera,
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 15.0, 8.0).looking_at(Vec3::new(0.0, tray.ground_y, 0.0), Vec3::Y),
    ));

    // Felt floor, wide enough for any window shape; walls come from the
    // tray bounds system.
    let felt = materials.add(StandardMaterial {
        base_color: Color::srgb(0.1, 0.32, 0.2),
        perceptual_roughness: 0.9,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(200.0, 1.0, 200.0))),
        MeshMaterial3d(felt),
        Transform::from_xyz(0.0, tray.ground_y - 0.5, 0.0),
        Collider::cuboid(100.0, 0.5, 100.0),
        RigidBody::Fixed,
        Restitution::coefficient(0.2),
        Friction::coefficient(0.8),
        TrayFloor,
    ));

    let total = settings.dice.count;
    for i in 0..total {
        let position = float_position(i, total, &settings);
        spawn_die(
            &mut commands,
            &mut meshes,
            &mut materials,
            &mut table,
            &settings,
            &mut rng.0,
            position,
        );
    }
    info!("Spawned {} floating dice", total);

    // Status text at top
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        StatusText,
    ));

    // Button row at bottom
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(16.0),
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                justify_content: JustifyContent::Center,
                column_gap: Val::Px(12.0),
                ..default()
            },
            ControlPanel,
        ))
        .with_children(|parent| {
            for action in TrayAction::BUTTONS {
                parent
                    .spawn((
                        Button,
                        Node {
                            padding: UiRect::axes(Val::Px(16.0), Val::Px(10.0)),
                            ..default()
                        },
                        BackgroundColor(BUTTON_IDLE),
                        action,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(action.label()),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            }
        });
}

/// Floating slot `index` of `total`: a centred grid at the float height.
pub fn float_position(index: usize, total: usize, settings: &TableSettings) -> Vec3 {
    let total = total.max(1);
    let cols = ((total as f32).sqrt().ceil() as usize).max(1);
    let rows = total.div_ceil(cols);
    let row = index / cols;
    let col = index % cols;

    let spacing = settings.dice.size * 2.0;
    let start_x = -((cols - 1) as f32 * spacing) / 2.0;
    let start_z = -((rows - 1) as f32 * spacing) / 2.0;

    Vec3::new(
        start_x + col as f32 * spacing,
        settings.tray.float_height(&settings.dice),
        start_z + row as f32 * spacing,
    )
}

/// Slot for one more floating die that keeps clear of the ones already
/// floating at `occupied` (XZ).
///
/// Walks a half-spacing lattice outward from the centre, ring by ring, and
/// takes the nearest point at least one die spacing from every occupied
/// position.
pub fn free_float_position(occupied: &[Vec2], settings: &TableSettings) -> Vec3 {
    let spacing = settings.dice.size * 2.0;
    let step = spacing / 2.0;
    let height = settings.tray.float_height(&settings.dice);
    let reach = MAX_DICE as i32 * 2;

    for ring in 0..=reach {
        let mut candidates: Vec<Vec2> = (-ring..=ring)
            .flat_map(|i| (-ring..=ring).map(move |j| (i, j)))
            .filter(|(i, j)| i.abs().max(j.abs()) == ring)
            .map(|(i, j)| Vec2::new(i as f32 * step, j as f32 * step))
            .collect();
        candidates.sort_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));

        let free = candidates.into_iter().find(|slot| {
            occupied
                .iter()
                .all(|other| other.distance(*slot) >= spacing - 1e-4)
        });
        if let Some(slot) = free {
            return Vec3::new(slot.x, height, slot.y);
        }
    }

    float_position(occupied.len(), occupied.len() + 1, settings)
}

/// Spawn a die: a kinematic physics body plus a separate render entity
/// carrying the mesh, pips and selection outline.
pub fn spawn_die(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    table: &mut DiceTable,
    settings: &TableSettings,
    rng: &mut impl Rng,
    position: Vec3,
) -> Entity {
    let size = settings.dice.size;
    let (mesh, collider) = create_die_mesh_and_collider(size);

    let die_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.96, 0.95, 0.9),
        reflectance: 0.5,
        perceptual_roughness: 0.3,
        ..default()
    });

    let pip_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.08, 0.1),
        unlit: true,
        ..default()
    });

    // Back faces only, so the shell reads as a rim around the die
    let outline_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.75, 0.1),
        unlit: true,
        cull_mode: Some(Face::Front),
        ..default()
    });

    let pip_mesh = meshes.add(Sphere::new(size * 0.08));

    let outline = commands
        .spawn((
            Mesh3d(meshes.add(create_outline_mesh(size))),
            MeshMaterial3d(outline_material),
            Transform::default(),
            Visibility::Hidden,
            DieOutline,
        ))
        .id();

    let visual = commands
        .spawn((
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(die_material),
            Transform::from_translation(position),
        ))
        .with_children(|parent| {
            for (pip, normal) in pip_positions(size) {
                parent.spawn((
                    Mesh3d(pip_mesh.clone()),
                    MeshMaterial3d(pip_material.clone()),
                    Transform::from_translation(pip).with_scale(Vec3::ONE - normal.abs() * 0.7),
                ));
            }
        })
        .add_child(outline)
        .id();

    let die = commands
        .spawn((
            Die::new(size, position.y, rng.gen_range(0.0..TAU)).with_visual(visual, outline),
            Transform::from_translation(position),
            RigidBody::KinematicPositionBased,
            collider,
            Velocity::zero(),
            Restitution::coefficient(settings.dice.restitution),
            Friction::coefficient(settings.dice.friction),
            ColliderMassProperties::Density(settings.dice.density),
            Ccd::enabled(),
        ))
        .id();

    commands.entity(visual).insert(DieVisual { die });
    table.register_die(die);

    die
}

/// Remove a die from the table, releasing its physics body and its visual
/// together.
pub fn destroy_die(commands: &mut Commands, table: &mut DiceTable, die: Entity, visual: Entity) {
    table.remove_die(die);
    commands.entity(visual).despawn();
    commands.entity(die).despawn();
}
