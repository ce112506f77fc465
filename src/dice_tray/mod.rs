pub mod gesture;
pub mod meshes;
pub mod picking;
pub mod systems;
pub mod types;

pub use gesture::*;
pub use meshes::*;
pub use picking::*;
pub use systems::*;
pub use types::*;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Physics step length; rapier advances exactly this much every frame.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Everything the tray needs: physics, resources, and the frame schedule.
///
/// Frame order: controls and pointer input, gather step, floating motion and
/// wall maintenance in `Update`; rapier steps in `PostUpdate`; after its
/// writeback the visuals, highlights and status text follow.
pub struct DiceTrayPlugin {
    pub settings: TableSettings,
    pub seed: Option<u64>,
}

impl DiceTrayPlugin {
    pub fn new(settings: TableSettings, seed: Option<u64>) -> Self {
        Self { settings, seed }
    }
}

impl Plugin for DiceTrayPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .insert_resource(TimestepMode::Fixed {
                dt: FIXED_TIMESTEP,
                substeps: 1,
            })
            .insert_resource(self.settings.clone())
            .insert_resource(TableRng::new(self.seed))
            .init_resource::<DiceTable>()
            .init_resource::<GestureController>()
            .init_resource::<TrayBounds>()
            .add_systems(Startup, (configure_physics, setup))
            .add_systems(
                Update,
                (
                    handle_table_controls,
                    handle_dice_count_keys,
                    style_tray_buttons,
                    handle_pointer_input,
                    gather_dragged_dice,
                    update_floating_dice,
                    maintain_tray_walls,
                )
                    .chain(),
            )
            .add_systems(
                PostUpdate,
                (sync_die_visuals, update_die_highlight, update_status_text)
                    .chain()
                    .after(PhysicsSet::Writeback),
            );
    }
}
