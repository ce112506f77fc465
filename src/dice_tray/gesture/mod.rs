//! Gesture Module
//!
//! This module turns pointer and touch input into die selection and the
//! gather-and-flick throw. Pressing anywhere but a settled die pulls every
//! floating die toward the pointer; releasing flicks them with a velocity
//! taken from the drag speed.

mod state;
mod systems;

pub use state::*;
pub use systems::*;
