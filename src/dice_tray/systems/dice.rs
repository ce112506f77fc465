//! Per-frame die systems
//!
//! This module contains the floating motion step, the one-way copy from
//! physics bodies to their render entities, selection highlighting and the
//! status read-out.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dice_tray::gesture::GestureController;
use crate::dice_tray::types::*;

/// Drive bobbing and tumbling of floating dice, in table order.
pub fn update_floating_dice(
    time: Res<Time>,
    settings: Res<TableSettings>,
    table: Res<DiceTable>,
    mut dice: Query<(&Die, &mut Transform, &mut Velocity, &mut RigidBody)>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    for &entity in &table.dice {
        let Ok((die, mut transform, mut velocity, mut rigid_body)) = dice.get_mut(entity) else {
            continue;
        };
        die.update(
            &mut DieBody::new(&mut transform, &mut velocity, &mut rigid_body),
            now,
            dt,
            &settings.dice,
        );
    }
}

/// Copy every physics body transform onto its render entity.
pub fn sync_die_visuals(
    dice: Query<(&Die, &Transform), Without<DieVisual>>,
    mut visuals: Query<&mut Transform, With<DieVisual>>,
) {
    for (die, body) in dice.iter() {
        let Ok(mut visual) = visuals.get_mut(die.visual) else {
            continue;
        };
        visual.translation = body.translation;
        visual.rotation = body.rotation;
    }
}

/// Emissive tint for a die: warm when kept, cool while gathered.
pub fn highlight_emissive(die: &Die) -> LinearRgba {
    if die.selected {
        LinearRgba::rgb(0.5, 0.35, 0.0)
    } else if die.is_dragging() {
        LinearRgba::rgb(0.1, 0.25, 0.5)
    } else {
        LinearRgba::BLACK
    }
}

pub fn update_die_highlight(
    dice: Query<&Die, Changed<Die>>,
    visuals: Query<&MeshMaterial3d<StandardMaterial>, With<DieVisual>>,
    mut outlines: Query<&mut Visibility, With<DieOutline>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for die in dice.iter() {
        let emissive = highlight_emissive(die);

        if let Ok(handle) = visuals.get(die.visual) {
            if let Some(material) = materials.get_mut(&handle.0) {
                if material.emissive != emissive {
                    material.emissive = emissive;
                }
            }
        }

        if let Ok(mut visibility) = outlines.get_mut(die.outline) {
            let wanted = if die.selected {
                Visibility::Visible
            } else {
                Visibility::Hidden
            };
            if *visibility != wanted {
                *visibility = wanted;
            }
        }
    }
}

/// Rebuild the status text from the current die states.
pub fn update_status_text(
    settings: Res<TableSettings>,
    table: Res<DiceTable>,
    controller: Res<GestureController>,
    dice: Query<(&Die, &Transform, &Velocity)>,
    mut text_query: Query<&mut Text, With<StatusText>>,
) {
    let snapshots: Vec<DieSnapshot> = table
        .dice
        .iter()
        .filter_map(|&entity| dice.get(entity).ok())
        .map(|(die, transform, velocity)| {
            DieSnapshot::new(
                die.state(velocity, &settings.dice),
                die.selected,
                die.value(transform),
            )
        })
        .collect();

    let status = describe_table(&snapshots, controller.is_active());

    for mut text in text_query.iter_mut() {
        if text.0 != status {
            text.0 = status.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_follows_flags() {
        let mut die = Die::new(1.0, 0.0, 0.0);
        assert_eq!(highlight_emissive(&die), LinearRgba::BLACK);

        die.start_gather();
        assert_eq!(highlight_emissive(&die), LinearRgba::rgb(0.1, 0.25, 0.5));

        die.toggle_selection();
        assert_eq!(highlight_emissive(&die), LinearRgba::rgb(0.5, 0.35, 0.0));
    }
}
