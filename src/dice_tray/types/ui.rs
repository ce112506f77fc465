//! UI components for the status panel and the table controls

use bevy::prelude::*;

/// Marker for the status text node
#[derive(Component)]
pub struct StatusText;

/// Marker for the button row container
#[derive(Component)]
pub struct ControlPanel;

/// Marks the render entity of a die and points back at its physics entity
#[derive(Component, Debug, Clone, Copy)]
pub struct DieVisual {
    pub die: Entity,
}

/// Outline shell shown around a selected die
#[derive(Component)]
pub struct DieOutline;

/// Static tray wall collider
#[derive(Component)]
pub struct TrayWall;

/// Static tray floor
#[derive(Component)]
pub struct TrayFloor;

/// Table-wide actions, triggered by buttons or keyboard shortcuts
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrayAction {
    /// Re-float every die that is not kept
    RollUnselected,
    /// Clear every selection and re-float all dice
    ResetAll,
    /// Throw every floating die with a random impulse
    ThrowAll,
    /// Toss every unselected die straight from where it is
    TossUnselected,
}

impl TrayAction {
    /// Actions that get an on-screen button, in display order
    pub const BUTTONS: [TrayAction; 3] = [
        TrayAction::RollUnselected,
        TrayAction::ResetAll,
        TrayAction::ThrowAll,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrayAction::RollUnselected => "Roll Unselected",
            TrayAction::ResetAll => "Reset All",
            TrayAction::ThrowAll => "Throw All",
            TrayAction::TossUnselected => "Toss Unselected",
        }
    }

    pub fn from_key(key: KeyCode) -> Option<TrayAction> {
        match key {
            KeyCode::Space => Some(TrayAction::TossUnselected),
            KeyCode::KeyR => Some(TrayAction::ResetAll),
            KeyCode::KeyT => Some(TrayAction::ThrowAll),
            KeyCode::KeyU => Some(TrayAction::RollUnselected),
            _ => None,
        }
    }
}
