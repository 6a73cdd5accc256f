//! Navigation domain: agent state machine on top of the mesh walker
//!
//! Contains:
//! - NavigationAgent / AgentPose (components)
//! - GoToLocation, MovementStarted, Arrived, NavigationFailed (events)
//! - MeshWalker capability + StraightLineWalker (headless)
//! - handle_go_to_location → advance_walker → detect_arrival (systems)

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;
pub mod walker;

#[cfg(test)]
pub(crate) mod test_support;

pub use components::*;
pub use events::*;
pub use systems::*;
pub use walker::*;

use crate::TwinSet;

/// Navigation Plugin
///
/// Registers the navigation events and the per-frame chain in `TwinSet::Navigation`.
/// Expects `LocationRegistry`, `ActiveWalker` and `FrameDelta` resources.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GoToLocation>()
            .add_event::<MovementStarted>()
            .add_event::<Arrived>()
            .add_event::<NavigationFailed>();

        app.add_systems(
            Update,
            (handle_go_to_location, advance_walker, detect_arrival)
                .chain()
                .in_set(TwinSet::Navigation),
        );
    }
}
