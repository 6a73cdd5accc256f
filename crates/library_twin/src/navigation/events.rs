//! Navigation events
//!
//! Raised once per transition. Camera and effects react to these instead of
//! polling the agent.

use bevy::prelude::*;

use crate::errors::NavigationError;

/// Command: walk the agent to a registry location
///
/// Written by the command bridge (one-shot) or by in-scene callers.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct GoToLocation {
    pub location_id: String,
}

impl GoToLocation {
    pub fn new(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
        }
    }
}

/// Event: agent entered `Moving` (also on cancel-and-replace)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MovementStarted {
    pub location_id: String,
    pub target: Vec3,
    /// True when an in-flight path was abandoned for this one
    pub replaced: bool,
}

/// Event: agent reached its destination
#[derive(Event, Debug, Clone, PartialEq)]
pub struct Arrived {
    pub location_id: String,
    pub position: Vec3,
}

/// Event: a `GoToLocation` could not be honoured (agent state unchanged)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct NavigationFailed {
    pub error: NavigationError,
}
