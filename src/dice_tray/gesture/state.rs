//! Gesture State
//!
//! Contains the resource tracking an in-progress gather gesture and the
//! conversion of a finished gesture into a throw impulse.

use bevy::prelude::*;
use rand::Rng;

use crate::dice_tray::types::GestureSettings;

/// A drag in progress: where it started, where the smoothed pointer is now,
/// and which dice it is gathering.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub start_screen: Vec2,
    pub current_screen: Vec2,
    pub start_ms: f64,
    /// Dice gathered at pointer-down, in table order
    pub targets: Vec<Entity>,
}

/// Resource for the gather-and-flick gesture
#[derive(Resource, Debug, Default)]
pub struct GestureController {
    pub session: Option<GestureSession>,
}

impl GestureController {
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start a session gathering `targets`. Nothing starts without targets.
    pub fn begin(&mut self, screen: Vec2, now_ms: f64, targets: Vec<Entity>) -> bool {
        if targets.is_empty() {
            return false;
        }

        self.session = Some(GestureSession {
            start_screen: screen,
            current_screen: screen,
            start_ms: now_ms,
            targets,
        });
        true
    }

    /// Follow the pointer with exponential smoothing.
    pub fn track(&mut self, screen: Vec2, smoothing: f32) {
        if let Some(session) = self.session.as_mut() {
            session.current_screen = session.current_screen.lerp(screen, smoothing);
        }
    }

    /// Smoothed screen point the gathered dice are steering toward
    pub fn aim_point(&self) -> Option<Vec2> {
        self.session.as_ref().map(|s| s.current_screen)
    }

    pub fn targets(&self) -> &[Entity] {
        self.session
            .as_ref()
            .map(|s| s.targets.as_slice())
            .unwrap_or(&[])
    }

    /// End the session and turn it into a throw: the gathered dice and the
    /// impulse to launch them with.
    pub fn finish(&mut self, now_ms: f64, settings: &GestureSettings) -> Option<(Vec<Entity>, Vec3)> {
        let session = self.session.take()?;
        let displacement = session.current_screen - session.start_screen;
        let elapsed_ms = (now_ms - session.start_ms) as f32;
        Some((
            session.targets,
            throw_impulse(displacement, elapsed_ms, settings),
        ))
    }

    /// Drop the session without throwing.
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

/// Launch velocity for a drag of `displacement` screen pixels over
/// `elapsed_ms`.
///
/// Screen X maps to world X and screen Y (down) to world Z. Elapsed time is
/// floored at `min_elapsed_ms` so a click-release cannot produce a spike.
/// The vertical component never drops below `min_lift`.
pub fn throw_impulse(displacement: Vec2, elapsed_ms: f32, settings: &GestureSettings) -> Vec3 {
    let elapsed = elapsed_ms.max(settings.min_elapsed_ms);
    let speed = displacement.length() / elapsed;
    let direction = displacement.normalize_or_zero();
    let magnitude = (speed * settings.throw_scale).min(settings.max_throw);

    Vec3::new(
        direction.x * magnitude,
        (magnitude * 0.5).max(settings.min_lift),
        direction.y * magnitude * 0.5,
    )
}

/// Impulse for throwing without a gesture ("Throw All").
pub fn random_throw_impulse(rng: &mut impl Rng, settings: &GestureSettings) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let magnitude = rng.gen_range(0.0..=settings.max_throw * 0.5);
    Vec3::new(
        angle.cos() * magnitude,
        (magnitude * 0.5).max(settings.min_lift),
        angle.sin() * magnitude * 0.5,
    )
}
