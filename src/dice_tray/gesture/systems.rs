//! Gesture Systems
//!
//! Contains systems that read mouse and touch input, pick settled dice for
//! selection, drive the gather session, and release it as a throw.
//!
//! The branching lives in [`press_tray`], [`release_tray`] and
//! [`gather_step`], which take plain inputs; the systems only collect them.

use bevy::input::touch::{TouchInput, TouchPhase, Touches};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::state::*;
use crate::dice_tray::picking::{pick_die, ray_plane_intersection, settled_dice};
use crate::dice_tray::types::*;

/// Press and release of the unified pointer for one frame
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerFrame {
    /// Screen position of a press that started this frame
    pub pressed_at: Option<Vec2>,
    pub released: bool,
}

impl PointerFrame {
    pub fn read(mouse: &ButtonInput<MouseButton>, touches: &Touches, cursor: Option<Vec2>) -> Self {
        let mouse_down = if mouse.just_pressed(MouseButton::Left) {
            cursor
        } else {
            None
        };
        let touch_down = touches.iter_just_pressed().next().map(|touch| touch.position());

        Self {
            pressed_at: mouse_down.or(touch_down),
            released: mouse.just_released(MouseButton::Left) || touches.any_just_released(),
        }
    }
}

/// What a pointer press did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// A settled die under the pointer was kept or released
    Toggled(Entity),
    /// A gather session started with this many floating dice
    Gathering(usize),
    /// Nothing settled was hit and nothing is floating
    Ignored,
}

/// Project a screen point through the camera onto the tray ground plane.
pub fn screen_to_ground(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    screen: Vec2,
    ground_y: f32,
) -> Option<Vec3> {
    let ray = camera.viewport_to_world(camera_transform, screen).ok()?;
    ray_plane_intersection(ray.origin, *ray.direction, ground_y)
}

/// Handle a press at `screen`. `hit` is the die the pointer ray met, if any.
///
/// A settled die toggles its selection and no session starts. Anything
/// else, including a hit on a die that is still moving or floating, begins
/// gathering every floating die.
#[allow(clippy::too_many_arguments)]
pub fn press_tray(
    hit: Option<Entity>,
    screen: Vec2,
    now_ms: f64,
    settings: &TableSettings,
    table: &DiceTable,
    controller: &mut GestureController,
    dice: &mut DiceBodies,
) -> PressOutcome {
    if let Some(entity) = hit {
        if let Ok((mut die, _, velocity, _)) = dice.get_mut(entity) {
            if die.state(&velocity, &settings.dice) == DieState::Settled {
                die.toggle_selection();
                debug!("Die {:?} selected: {}", entity, die.selected);
                return PressOutcome::Toggled(entity);
            }
        }
    }

    let floating: Vec<Entity> = table
        .dice
        .iter()
        .copied()
        .filter(|&entity| dice.get(entity).is_ok_and(|(die, ..)| die.is_floating()))
        .collect();
    let count = floating.len();

    if !controller.begin(screen, now_ms, floating.clone()) {
        return PressOutcome::Ignored;
    }
    for entity in floating {
        if let Ok((mut die, ..)) = dice.get_mut(entity) {
            die.start_gather();
        }
    }
    debug!("Gathering {} floating dice", count);
    PressOutcome::Gathering(count)
}

/// End the active session and throw every target still being gathered.
/// Returns how many dice left the hand.
pub fn release_tray(
    now_ms: f64,
    settings: &TableSettings,
    controller: &mut GestureController,
    rng: &mut impl Rng,
    dice: &mut DiceBodies,
) -> usize {
    let Some((targets, impulse)) = controller.finish(now_ms, &settings.gesture) else {
        return 0;
    };

    let mut thrown = 0;
    for entity in targets {
        let Ok((mut die, mut transform, mut velocity, mut rigid_body)) = dice.get_mut(entity) else {
            continue;
        };
        if !die.is_dragging() {
            continue;
        }
        die.throw_dice(
            &mut DieBody::new(&mut transform, &mut velocity, &mut rigid_body),
            impulse,
            &settings.dice,
            rng,
        );
        thrown += 1;
    }
    info!("Threw {} dice with impulse {:?}", thrown, impulse);
    thrown
}

/// Steer every gathered die of the session toward `target` on the ground.
pub fn gather_step(
    target: Vec2,
    dt: f32,
    settings: &GestureSettings,
    controller: &GestureController,
    dice: &mut DiceBodies,
) {
    let dragging: Vec<Entity> = controller
        .targets()
        .iter()
        .copied()
        .filter(|&entity| dice.get(entity).is_ok_and(|(die, ..)| die.is_dragging()))
        .collect();
    let count = dragging.len();

    for (index, entity) in dragging.into_iter().enumerate() {
        let Ok((mut die, mut transform, mut velocity, mut rigid_body)) = dice.get_mut(entity) else {
            continue;
        };
        die.gather_to_position(
            &mut DieBody::new(&mut transform, &mut velocity, &mut rigid_body),
            target,
            dt,
            index,
            count,
            settings,
        );
    }
}

/// Feed pointer moves into the session, one smoothing step per move.
pub fn follow_pointer(
    controller: &mut GestureController,
    moves: impl IntoIterator<Item = Vec2>,
    smoothing: f32,
) {
    for screen in moves {
        controller.track(screen, smoothing);
    }
}

/// Pointer down selects a settled die or starts gathering the floating ones;
/// pointer moves feed the smoothed aim point; pointer up throws.
#[allow(clippy::too_many_arguments)]
pub fn handle_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut cursor_moves: MessageReader<CursorMoved>,
    mut touch_inputs: MessageReader<TouchInput>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    buttons: Query<&Interaction, With<Button>>,
    rapier_context: ReadRapierContext,
    time: Res<Time>,
    settings: Res<TableSettings>,
    table: Res<DiceTable>,
    mut controller: ResMut<GestureController>,
    mut rng: ResMut<TableRng>,
    mut dice: DiceBodies,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let pointer = PointerFrame::read(&mouse, &touches, window.cursor_position());
    let now_ms = time.elapsed_secs_f64() * 1000.0;

    if let Some(screen) = pointer.pressed_at {
        // Presses on the control buttons belong to the buttons
        let over_ui = buttons.iter().any(|i| *i != Interaction::None);
        if !over_ui {
            if let Ok((camera, camera_transform)) = camera_query.single() {
                let hit = camera
                    .viewport_to_world(camera_transform, screen)
                    .ok()
                    .zip(rapier_context.single().ok())
                    .and_then(|(ray, context)| {
                        let candidates = settled_dice(&table, &dice, &settings.dice);
                        pick_die(&context, ray, &candidates)
                    });
                press_tray(hit, screen, now_ms, &settings, &table, &mut controller, &mut dice);
            }
        }
    }

    // Smoothing is applied once per move, so a still pointer leaves the aim
    // point where it is.
    let moves = cursor_moves.read().map(|moved| moved.position).chain(
        touch_inputs
            .read()
            .filter(|touch| touch.phase == TouchPhase::Moved)
            .map(|touch| touch.position),
    );
    follow_pointer(&mut controller, moves, settings.gesture.smoothing);

    if pointer.released {
        release_tray(now_ms, &settings, &mut controller, &mut rng.0, &mut dice);
    }
}

/// Each frame of an active session, steer every gathered die toward the
/// ground projection of the smoothed pointer.
pub fn gather_dragged_dice(
    time: Res<Time>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    settings: Res<TableSettings>,
    controller: Res<GestureController>,
    mut dice: DiceBodies,
) {
    let Some(aim) = controller.aim_point() else {
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let Some(ground) = screen_to_ground(camera, camera_transform, aim, settings.tray.ground_y)
    else {
        return;
    };

    gather_step(
        ground.xz(),
        time.delta_secs(),
        &settings.gesture,
        &controller,
        &mut dice,
    );
}
