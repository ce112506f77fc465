//! Camera marker for the top-down tray view

use bevy::prelude::*;

/// Marker component for the camera that looks down onto the tray.
/// Picking rays and the tray bounds are both derived from it.
#[derive(Component)]
pub struct MainCamera;
