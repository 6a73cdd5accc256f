//! Navigation components: agent state machine and pose

use bevy::prelude::*;

/// Agent state machine
///
/// `Idle → Moving → Arrived → Moving → ...`
/// `Arrived` is terminal until the next `GoToLocation`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AgentState {
    #[default]
    Idle,
    /// A path has been requested from the walker toward `target`
    Moving { target: Vec3, stopping_distance: f32 },
    Arrived,
}

/// Navigation agent driven by `GoToLocation` events and per-frame distance checks
///
/// One agent per session, spawned at startup and never despawned.
#[derive(Component, Debug, Clone)]
pub struct NavigationAgent {
    pub state: AgentState,
    /// Location id of the active (or last reached) destination
    pub destination: Option<String>,
    /// Mirrors the walker: true until the solver has produced a route
    pub path_pending: bool,
    pub remaining_distance: f32,
    /// Applied to every new destination
    pub default_stopping_distance: f32,
    /// Arrival also triggers below this, whatever the stopping distance
    pub arrival_floor: f32,
}

impl NavigationAgent {
    pub fn new(default_stopping_distance: f32, arrival_floor: f32) -> Self {
        Self {
            state: AgentState::Idle,
            destination: None,
            path_pending: false,
            remaining_distance: 0.0,
            default_stopping_distance: default_stopping_distance.max(0.0),
            arrival_floor,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, AgentState::Moving { .. })
    }

    /// Arrival rule: solver done AND (within stopping distance OR under the floor)
    pub fn has_arrived(&self, stopping_distance: f32) -> bool {
        !self.path_pending
            && (self.remaining_distance <= stopping_distance
                || self.remaining_distance < self.arrival_floor)
    }
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self::new(1.5, 0.5)
    }
}

/// World pose of the agent (written from the walker every frame)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    /// −Z forward
    pub rotation: Quat,
}

impl AgentPose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Agent-local point to world space (unit scale)
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}

impl Default for AgentPose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}
