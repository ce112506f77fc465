//! Die component and its lifecycle
//!
//! A die is a kinematic puppet while it floats above the tray and a regular
//! dynamic rapier body once thrown. The physics mode is a tagged enum; the
//! only places allowed to flip the rapier body type are
//! [`Die::enter_floating`] and [`Die::enter_rolling`].

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::settings::{DiceSettings, GestureSettings};

/// Local face normals in value order: +X=1, -X=2, +Y=3, -Y=4, +Z=5, -Z=6
pub const FACE_NORMALS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// How the rapier body behind a die is simulated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicsMode {
    /// Transform written by the game every frame; gravity and contacts ignored.
    KinematicFloating { dragging: bool },
    /// Regular dynamic body under the solver.
    DynamicRolling,
}

/// Observable lifecycle state of a die
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DieState {
    Floating,
    Dragging,
    Rolling,
    Settled,
}

/// Mutable view of the physics collaborator for one die.
pub struct DieBody<'a> {
    pub transform: &'a mut Transform,
    pub velocity: &'a mut Velocity,
    pub rigid_body: &'a mut RigidBody,
}

impl<'a> DieBody<'a> {
    pub fn new(
        transform: &'a mut Transform,
        velocity: &'a mut Velocity,
        rigid_body: &'a mut RigidBody,
    ) -> Self {
        Self {
            transform,
            velocity,
            rigid_body,
        }
    }
}

/// Query over every die together with the body parts it drives
pub type DiceBodies<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Die,
        &'static mut Transform,
        &'static mut Velocity,
        &'static mut RigidBody,
    ),
>;

/// Component attached to the physics entity of each die
#[derive(Component, Debug, Clone)]
pub struct Die {
    pub size: f32,
    pub selected: bool,
    /// Vertical centre of the floating oscillation
    pub base_height: f32,
    /// Random phase so floating dice bob out of step
    pub float_phase: f32,
    /// Render entity mirroring this body
    pub visual: Entity,
    /// Outline shell shown while selected (child of `visual`)
    pub outline: Entity,
    mode: PhysicsMode,
}

impl Die {
    pub fn new(size: f32, base_height: f32, float_phase: f32) -> Self {
        Self {
            size,
            selected: false,
            base_height,
            float_phase,
            visual: Entity::PLACEHOLDER,
            outline: Entity::PLACEHOLDER,
            mode: PhysicsMode::KinematicFloating { dragging: false },
        }
    }

    pub fn with_visual(mut self, visual: Entity, outline: Entity) -> Self {
        self.visual = visual;
        self.outline = outline;
        self
    }

    pub fn mode(&self) -> PhysicsMode {
        self.mode
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.mode, PhysicsMode::KinematicFloating { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, PhysicsMode::KinematicFloating { dragging: true })
    }

    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }

    /// Lifecycle state derived from the mode tag and the body velocity.
    pub fn state(&self, velocity: &Velocity, settings: &DiceSettings) -> DieState {
        match self.mode {
            PhysicsMode::KinematicFloating { dragging: true } => DieState::Dragging,
            PhysicsMode::KinematicFloating { dragging: false } => DieState::Floating,
            PhysicsMode::DynamicRolling if Self::is_at_rest(velocity, settings) => {
                DieState::Settled
            }
            PhysicsMode::DynamicRolling => DieState::Rolling,
        }
    }

    pub fn is_at_rest(velocity: &Velocity, settings: &DiceSettings) -> bool {
        velocity.linvel.length() < settings.rest_linear_epsilon
            && velocity.angvel.length() < settings.rest_angular_epsilon
    }

    /// Up-facing value of this die given its body transform.
    pub fn value(&self, transform: &Transform) -> u32 {
        face_value(transform.rotation)
    }

    fn enter_floating(&mut self, body: &mut DieBody) {
        self.mode = PhysicsMode::KinematicFloating { dragging: false };
        *body.rigid_body = RigidBody::KinematicPositionBased;
    }

    fn enter_rolling(&mut self, body: &mut DieBody) {
        self.mode = PhysicsMode::DynamicRolling;
        *body.rigid_body = RigidBody::Dynamic;
    }

    /// Teleport above the tray and toss with random velocity. Selected dice
    /// are kept where they are.
    pub fn roll(&mut self, body: &mut DieBody, settings: &DiceSettings, rng: &mut impl Rng) {
        if self.selected {
            return;
        }

        self.enter_rolling(body);

        let spread = settings.roll_spread;
        body.transform.translation = Vec3::new(
            rng.gen_range(-spread..=spread),
            self.base_height + rng.gen_range(0.0..=settings.roll_lift),
            rng.gen_range(-spread..=spread),
        );
        body.transform.rotation = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
        );

        let lateral = settings.roll_linear;
        body.velocity.linvel = Vec3::new(
            rng.gen_range(-lateral..=lateral),
            rng.gen_range(settings.roll_up_min..=settings.roll_up_max),
            rng.gen_range(-lateral..=lateral),
        );
        body.velocity.angvel = random_spin(rng, settings.spin_min, settings.spin_max);
    }

    /// Per-frame floating motion. Only floating dice that are not being
    /// gathered bob and tumble; everything else is left to the solver.
    pub fn update(&self, body: &mut DieBody, now_secs: f32, dt: f32, settings: &DiceSettings) {
        if self.mode != (PhysicsMode::KinematicFloating { dragging: false }) {
            return;
        }

        let t = now_secs;
        let phase = self.float_phase;
        body.transform.translation.y =
            self.base_height + (t * settings.bob_speed + phase).sin() * settings.bob_amplitude;

        let spin = Vec3::new(
            (t * 0.5 + phase).sin(),
            (t * 0.3 + phase).cos(),
            (t * 0.4 + phase * 0.5).sin(),
        ) * settings.tumble_speed;
        body.velocity.linvel = Vec3::ZERO;
        body.velocity.angvel = spin;
        body.transform.rotation =
            (Quat::from_scaled_axis(spin * dt) * body.transform.rotation).normalize();
    }

    pub fn toggle_selection(&mut self) {
        self.selected = !self.selected;
    }

    pub fn clear_selection(&mut self) {
        self.selected = false;
    }

    pub fn start_gather(&mut self) {
        if self.is_floating() {
            self.mode = PhysicsMode::KinematicFloating { dragging: true };
        }
    }

    /// Steer a gathered die toward its slot around `target` on the XZ plane.
    ///
    /// Slots fan out on a circle so several dice do not pile onto the aim
    /// point. The step is damped and capped at `gather_speed * dt`; within
    /// `snap_distance` the die is placed on its slot directly.
    pub fn gather_to_position(
        &mut self,
        body: &mut DieBody,
        target: Vec2,
        dt: f32,
        index: usize,
        count: usize,
        settings: &GestureSettings,
    ) {
        if !self.is_dragging() {
            return;
        }

        let goal = target + gather_offset(index, count);
        let current = Vec2::new(body.transform.translation.x, body.transform.translation.z);
        let delta = goal - current;

        let next = if delta.length() < settings.snap_distance {
            goal
        } else {
            current + (delta * settings.damping).clamp_length_max(settings.gather_speed * dt)
        };

        body.transform.translation.x = next.x;
        body.transform.translation.z = next.y;
    }

    /// Release a gathered die into the simulation with `impulse` as its
    /// launch velocity.
    pub fn throw_dice(
        &mut self,
        body: &mut DieBody,
        impulse: Vec3,
        settings: &DiceSettings,
        rng: &mut impl Rng,
    ) {
        if !self.is_dragging() {
            return;
        }

        self.selected = false;
        self.enter_rolling(body);

        let j = settings.throw_jitter;
        body.velocity.linvel = impulse
            + Vec3::new(
                rng.gen_range(-j..=j),
                rng.gen_range(-j..=j),
                rng.gen_range(-j..=j),
            );
        body.velocity.angvel = random_spin(rng, settings.spin_min, settings.spin_max);
    }

    /// Put the die back into kinematic floating at `position`.
    pub fn reset_to_floating(&mut self, body: &mut DieBody, position: Vec3) {
        self.enter_floating(body);
        self.selected = false;
        self.base_height = position.y;
        body.transform.translation = position;
        *body.velocity = Velocity::zero();
    }
}

/// Index of the face whose rotated normal points most nearly up, plus one.
/// Ties go to the first face in [`FACE_NORMALS`] order.
pub fn face_value(rotation: Quat) -> u32 {
    let mut best_index = 0;
    let mut best_dot = f32::NEG_INFINITY;

    for (i, normal) in FACE_NORMALS.iter().enumerate() {
        let dot = (rotation * *normal).dot(Vec3::Y);
        if dot > best_dot {
            best_dot = dot;
            best_index = i;
        }
    }

    best_index as u32 + 1
}

/// XZ offset of gather slot `index` out of `count`.
pub fn gather_offset(index: usize, count: usize) -> Vec2 {
    if count == 0 {
        return Vec2::ZERO;
    }
    let angle = (index as f32 / count as f32) * TAU;
    let radius = (count as f32 * 0.3).max(0.8);
    Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Random angular velocity with every component in `min..=max` and a random sign.
pub fn random_spin(rng: &mut impl Rng, min: f32, max: f32) -> Vec3 {
    let mut axis = || {
        let magnitude = rng.gen_range(min..=max);
        if rng.gen_bool(0.5) {
            magnitude
        } else {
            -magnitude
        }
    };
    Vec3::new(axis(), axis(), axis())
}
