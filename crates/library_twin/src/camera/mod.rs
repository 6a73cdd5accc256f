//! Camera director: chase / overview
//!
//! Reacts to navigation transitions only; never writes agent state.

use bevy::prelude::*;

pub mod components;
pub mod smoothing;
pub mod systems;


pub use components::*;
pub use smoothing::{rotation_step, smooth_damp};
pub use systems::*;

use crate::TwinSet;

/// Camera Plugin
///
/// Mode switch first (so the pose update of the same frame already uses the
/// new mode), then the pose update.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (switch_camera_mode, update_camera_director)
                .chain()
                .in_set(TwinSet::Camera),
        );
    }
}
