//! Table settings and loading
//!
//! Every tunable of the tray lives here. Settings are read from an optional
//! RON file; missing fields fall back to their defaults.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Fewest dice the table will hold
pub const MIN_DICE: usize = 1;
/// Most dice the table will hold
pub const MAX_DICE: usize = 24;

/// Die body, floating motion and random roll ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceSettings {
    pub count: usize,
    pub size: f32,
    /// Height of the floating plane above the tray floor
    pub float_elevation: f32,
    pub bob_amplitude: f32,
    /// Bob angular frequency in radians per second
    pub bob_speed: f32,
    /// Cosmetic tumbling speed while floating (rad/s)
    pub tumble_speed: f32,
    pub rest_linear_epsilon: f32,
    pub rest_angular_epsilon: f32,
    /// Half width of the square a direct roll teleports into
    pub roll_spread: f32,
    pub roll_lift: f32,
    pub roll_linear: f32,
    pub roll_up_min: f32,
    pub roll_up_max: f32,
    pub spin_min: f32,
    pub spin_max: f32,
    pub throw_jitter: f32,
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
}

impl Default for DiceSettings {
    fn default() -> Self {
        Self {
            count: 6,
            size: 1.0,
            float_elevation: 3.0,
            bob_amplitude: 0.25,
            bob_speed: 2.0,
            tumble_speed: 0.6,
            rest_linear_epsilon: 0.1,
            rest_angular_epsilon: 0.1,
            roll_spread: 2.0,
            roll_lift: 1.0,
            roll_linear: 4.0,
            roll_up_min: 2.0,
            roll_up_max: 5.0,
            spin_min: 5.0,
            spin_max: 15.0,
            throw_jitter: 0.5,
            friction: 0.6,
            restitution: 0.3,
            density: 1.5,
        }
    }
}

impl DiceSettings {
    fn float_fields(&mut self) -> [&mut f32; 18] {
        [
            &mut self.size,
            &mut self.float_elevation,
            &mut self.bob_amplitude,
            &mut self.bob_speed,
            &mut self.tumble_speed,
            &mut self.rest_linear_epsilon,
            &mut self.rest_angular_epsilon,
            &mut self.roll_spread,
            &mut self.roll_lift,
            &mut self.roll_linear,
            &mut self.roll_up_min,
            &mut self.roll_up_max,
            &mut self.spin_min,
            &mut self.spin_max,
            &mut self.throw_jitter,
            &mut self.friction,
            &mut self.restitution,
            &mut self.density,
        ]
    }
}

/// Gather-and-flick gesture tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Exponential smoothing factor applied to pointer moves
    pub smoothing: f32,
    /// Maximum gather speed in world units per second
    pub gather_speed: f32,
    pub snap_distance: f32,
    pub damping: f32,
    /// Drag speed (pixels per millisecond) to throw magnitude
    pub throw_scale: f32,
    pub max_throw: f32,
    pub min_lift: f32,
    /// Lower bound on gesture duration before dividing by it
    pub min_elapsed_ms: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            smoothing: 0.2,
            gather_speed: 6.0,
            snap_distance: 0.4,
            damping: 0.7,
            throw_scale: 0.3,
            max_throw: 15.0,
            min_lift: 5.0,
            min_elapsed_ms: 16.0,
        }
    }
}

impl GestureSettings {
    fn float_fields(&mut self) -> [&mut f32; 8] {
        [
            &mut self.smoothing,
            &mut self.gather_speed,
            &mut self.snap_distance,
            &mut self.damping,
            &mut self.throw_scale,
            &mut self.max_throw,
            &mut self.min_lift,
            &mut self.min_elapsed_ms,
        ]
    }
}

/// Tray geometry, camera and world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraySettings {
    pub ground_y: f32,
    /// Camera height above the ground plane
    pub camera_distance: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,
    pub gravity: f32,
    pub orientation_debounce_ms: f32,
}

impl Default for TraySettings {
    fn default() -> Self {
        Self {
            ground_y: -5.0,
            camera_distance: 20.0,
            fov_degrees: 45.0,
            wall_thickness: 1.0,
            wall_height: 12.0,
            gravity: -30.0,
            orientation_debounce_ms: 100.0,
        }
    }
}

impl TraySettings {
    fn float_fields(&mut self) -> [&mut f32; 7] {
        [
            &mut self.ground_y,
            &mut self.camera_distance,
            &mut self.fov_degrees,
            &mut self.wall_thickness,
            &mut self.wall_height,
            &mut self.gravity,
            &mut self.orientation_debounce_ms,
        ]
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// World height of the floating plane
    pub fn float_height(&self, dice: &DiceSettings) -> f32 {
        self.ground_y + dice.float_elevation
    }
}

/// Resolved settings for the whole table
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub dice: DiceSettings,
    pub gesture: GestureSettings,
    pub tray: TraySettings,
}

impl TableSettings {
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::parse(&contents).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        ron::from_str::<TableSettings>(contents)
            .map(Self::sanitized)
            .map_err(|e| e.to_string())
    }

    /// Clamp values into ranges the systems can work with.
    ///
    /// `inf` and `NaN` are valid RON floats; they fall back to the default
    /// before any clamping, since neither `max` nor `clamp` removes them.
    pub fn sanitized(mut self) -> Self {
        let mut defaults = TableSettings::default();
        replace_non_finite(self.dice.float_fields(), defaults.dice.float_fields());
        replace_non_finite(self.gesture.float_fields(), defaults.gesture.float_fields());
        replace_non_finite(self.tray.float_fields(), defaults.tray.float_fields());

        let dice = &mut self.dice;
        dice.count = dice.count.clamp(MIN_DICE, MAX_DICE);
        dice.size = dice.size.max(0.1);
        dice.bob_amplitude = dice.bob_amplitude.max(0.0);
        dice.rest_linear_epsilon = dice.rest_linear_epsilon.max(f32::EPSILON);
        dice.rest_angular_epsilon = dice.rest_angular_epsilon.max(f32::EPSILON);
        dice.roll_spread = dice.roll_spread.max(0.0);
        dice.roll_lift = dice.roll_lift.max(0.0);
        dice.roll_linear = dice.roll_linear.max(0.0);
        dice.roll_up_min = dice.roll_up_min.max(0.0);
        dice.roll_up_max = dice.roll_up_max.max(dice.roll_up_min);
        dice.spin_min = dice.spin_min.max(0.0);
        dice.spin_max = dice.spin_max.max(dice.spin_min);
        dice.throw_jitter = dice.throw_jitter.max(0.0);
        dice.density = dice.density.max(0.01);

        let gesture = &mut self.gesture;
        gesture.smoothing = gesture.smoothing.clamp(0.01, 1.0);
        gesture.gather_speed = gesture.gather_speed.max(0.0);
        gesture.snap_distance = gesture.snap_distance.max(0.0);
        gesture.damping = gesture.damping.clamp(0.0, 1.0);
        gesture.max_throw = gesture.max_throw.max(0.0);
        gesture.min_elapsed_ms = gesture.min_elapsed_ms.max(1.0);

        let tray = &mut self.tray;
        tray.camera_distance = tray.camera_distance.max(1.0);
        tray.fov_degrees = tray.fov_degrees.clamp(1.0, 170.0);
        tray.wall_thickness = tray.wall_thickness.max(0.05);
        tray.wall_height = tray.wall_height.max(0.5);
        tray.orientation_debounce_ms = tray.orientation_debounce_ms.max(0.0);

        self
    }
}

fn replace_non_finite<const N: usize>(values: [&mut f32; N], fallbacks: [&mut f32; N]) {
    for (value, fallback) in values.into_iter().zip(fallbacks) {
        if !value.is_finite() {
            *value = *fallback;
        }
    }
}
