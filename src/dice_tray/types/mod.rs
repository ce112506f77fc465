//! Type definitions for the floating dice tray
//!
//! This module is organized into submodules:
//! - `die` - Die component, physics mode tagging, face value and rest checks
//! - `table` - Table context owning dice and walls, shared RNG
//! - `settings` - Tunables and RON settings loading
//! - `status` - Status panel snapshots and text
//! - `ui` - UI and marker components, table actions
//! - `camera` - Camera marker

pub mod camera;
pub mod die;
pub mod settings;
pub mod status;
pub mod table;
pub mod ui;

// Re-export all public types for convenient access
pub use camera::*;
pub use die::*;
pub use settings::*;
pub use status::*;
pub use table::*;
pub use ui::*;
