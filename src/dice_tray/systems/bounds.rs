//! Tray bounds
//!
//! The tray is whatever rectangle of the ground plane the camera can see.
//! Whenever the window changes shape the four walls around it are torn down
//! and rebuilt as a batch.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier3d::prelude::*;

use crate::dice_tray::types::*;

/// One static wall box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSpec {
    pub center: Vec3,
    pub half_extents: Vec3,
}

/// Half width (X) and half depth (Z) of the ground area visible from a
/// camera `distance` above it.
pub fn visible_half_extents(fov_y: f32, aspect: f32, distance: f32) -> Vec2 {
    let half_depth = (fov_y / 2.0).tan() * distance;
    Vec2::new(half_depth * aspect, half_depth)
}

/// Walls enclosing the `half` rectangle: +X, -X, +Z, -Z.
pub fn wall_layout(half: Vec2, tray: &TraySettings) -> [WallSpec; 4] {
    let t = tray.wall_thickness / 2.0;
    let h = tray.wall_height / 2.0;
    let y = tray.ground_y + h;

    [
        WallSpec {
            center: Vec3::new(half.x + t, y, 0.0),
            half_extents: Vec3::new(t, h, half.y + tray.wall_thickness),
        },
        WallSpec {
            center: Vec3::new(-half.x - t, y, 0.0),
            half_extents: Vec3::new(t, h, half.y + tray.wall_thickness),
        },
        WallSpec {
            center: Vec3::new(0.0, y, half.y + t),
            half_extents: Vec3::new(half.x + tray.wall_thickness, h, t),
        },
        WallSpec {
            center: Vec3::new(0.0, y, -half.y - t),
            half_extents: Vec3::new(half.x + tray.wall_thickness, h, t),
        },
    ]
}

/// Resource tracking the viewport the walls were built for
#[derive(Resource, Debug, Default)]
pub struct TrayBounds {
    pub viewport: Vec2,
    pub half_extents: Vec2,
    /// Deadline for a debounced rebuild after an orientation flip
    pub pending_rebuild_ms: Option<f64>,
}

fn is_portrait(viewport: Vec2) -> bool {
    viewport.y > viewport.x
}

impl TrayBounds {
    /// Feed the current viewport; returns true when the walls should be
    /// rebuilt this frame.
    ///
    /// Plain resizes rebuild at once. A portrait/landscape flip, and any
    /// resize while one is pending, waits `debounce_ms` for the window to
    /// stop changing.
    pub fn observe(&mut self, viewport: Vec2, now_ms: f64, debounce_ms: f64) -> bool {
        if viewport != self.viewport {
            let first = self.viewport == Vec2::ZERO;
            let flipped = !first && is_portrait(viewport) != is_portrait(self.viewport);
            self.viewport = viewport;

            if flipped || self.pending_rebuild_ms.is_some() {
                self.pending_rebuild_ms = Some(now_ms + debounce_ms);
                return false;
            }
            return true;
        }

        match self.pending_rebuild_ms {
            Some(due) if now_ms >= due => {
                self.pending_rebuild_ms = None;
                true
            }
            _ => false,
        }
    }
}

pub fn maintain_tray_walls(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    settings: Res<TableSettings>,
    mut bounds: ResMut<TrayBounds>,
    mut table: ResMut<DiceTable>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let viewport = Vec2::new(window.width(), window.height());
    // Minimized
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return;
    }

    let now_ms = time.elapsed_secs_f64() * 1000.0;
    let debounce_ms = settings.tray.orientation_debounce_ms as f64;
    if !bounds.observe(viewport, now_ms, debounce_ms) {
        return;
    }

    let half = visible_half_extents(
        settings.tray.fov_radians(),
        viewport.x / viewport.y,
        settings.tray.camera_distance,
    );
    bounds.half_extents = half;

    for wall in table.take_walls() {
        commands.entity(wall).despawn();
    }

    for spec in wall_layout(half, &settings.tray) {
        let wall = commands
            .spawn((
                Transform::from_translation(spec.center),
                Collider::cuboid(spec.half_extents.x, spec.half_extents.y, spec.half_extents.z),
                RigidBody::Fixed,
                Restitution::coefficient(0.4),
                Friction::coefficient(0.3),
                TrayWall,
            ))
            .id();
        table.walls.push(wall);
    }

    info!(
        "Rebuilt tray walls for {:.0}x{:.0} viewport (half extents {:.2} x {:.2})",
        viewport.x, viewport.y, half.x, half.y
    );
}
