//! Table controls
//!
//! On-screen buttons and keyboard shortcuts for table-wide actions, plus
//! adding and removing dice at runtime.

use bevy::prelude::*;
use rand::Rng;

use super::setup::{
    destroy_die, float_position, free_float_position, spawn_die, BUTTON_HOVERED, BUTTON_IDLE,
    BUTTON_PRESSED,
};
use crate::dice_tray::gesture::{random_throw_impulse, GestureController};
use crate::dice_tray::types::*;

/// Collect button presses and shortcut keys and apply them to the table.
pub fn handle_table_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    buttons: Query<(&Interaction, &TrayAction), (Changed<Interaction>, With<Button>)>,
    settings: Res<TableSettings>,
    table: Res<DiceTable>,
    mut controller: ResMut<GestureController>,
    mut rng: ResMut<TableRng>,
    mut dice: DiceBodies,
) {
    let mut actions: Vec<TrayAction> = buttons
        .iter()
        .filter(|(interaction, _)| **interaction == Interaction::Pressed)
        .map(|(_, action)| *action)
        .collect();
    actions.extend(
        keyboard
            .get_just_pressed()
            .filter_map(|key| TrayAction::from_key(*key)),
    );

    for action in actions {
        info!("{}", action.label());
        apply_tray_action(
            action,
            &settings,
            &table,
            &mut controller,
            &mut rng.0,
            &mut dice,
        );
    }
}

/// Apply one table-wide action. Any gesture in progress is abandoned first.
pub fn apply_tray_action(
    action: TrayAction,
    settings: &TableSettings,
    table: &DiceTable,
    controller: &mut GestureController,
    rng: &mut impl Rng,
    dice: &mut DiceBodies,
) {
    controller.cancel();
    let total = table.dice.len();

    for (index, &entity) in table.dice.iter().enumerate() {
        let Ok((mut die, mut transform, mut velocity, mut rigid_body)) = dice.get_mut(entity) else {
            continue;
        };
        let body = &mut DieBody::new(&mut transform, &mut velocity, &mut rigid_body);

        match action {
            TrayAction::RollUnselected => {
                if !die.selected {
                    die.reset_to_floating(body, float_position(index, total, settings));
                }
            }
            TrayAction::ResetAll => {
                die.clear_selection();
                die.reset_to_floating(body, float_position(index, total, settings));
            }
            TrayAction::ThrowAll => {
                if die.is_floating() {
                    die.start_gather();
                    let impulse = random_throw_impulse(rng, &settings.gesture);
                    die.throw_dice(body, impulse, &settings.dice, rng);
                }
            }
            TrayAction::TossUnselected => {
                die.roll(body, &settings.dice, rng);
            }
        }
    }
}

/// `+` adds a floating die, `-` removes the most recently added one.
#[allow(clippy::too_many_arguments)]
pub fn handle_dice_count_keys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<TableSettings>,
    mut table: ResMut<DiceTable>,
    mut rng: ResMut<TableRng>,
    dice: Query<(&Die, &Transform)>,
) {
    let add = keyboard.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]);
    let remove = keyboard.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]);

    if add && table.dice.len() < MAX_DICE {
        let occupied: Vec<Vec2> = table
            .dice
            .iter()
            .filter_map(|&entity| dice.get(entity).ok())
            .filter(|(die, _)| die.is_floating())
            .map(|(_, transform)| transform.translation.xz())
            .collect();
        let position = free_float_position(&occupied, &settings);
        spawn_die(
            &mut commands,
            &mut meshes,
            &mut materials,
            &mut table,
            &settings,
            &mut rng.0,
            position,
        );
        info!("Added a die ({} on the table)", table.dice.len());
    }

    if remove && table.dice.len() > MIN_DICE {
        if let Some(&entity) = table.dice.last() {
            if let Ok((die, _)) = dice.get(entity) {
                let visual = die.visual;
                destroy_die(&mut commands, &mut table, entity, visual);
                info!("Removed a die ({} on the table)", table.dice.len());
            }
        }
    }
}

pub fn style_tray_buttons(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<TrayAction>)>,
) {
    for (interaction, mut color) in buttons.iter_mut() {
        *color = BackgroundColor(match *interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        });
    }
}
