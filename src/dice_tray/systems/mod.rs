//! Systems for the floating dice tray
//!
//! - `setup` - Camera, light, floor, dice and UI spawning
//! - `dice` - Floating motion, visual sync, highlight, status text
//! - `bounds` - Tray walls derived from the camera frustum
//! - `controls` - Buttons, shortcuts, adding and removing dice

pub mod bounds;
pub mod controls;
pub mod dice;
pub mod setup;

pub use bounds::*;
pub use controls::*;
pub use dice::*;
pub use setup::*;
