//! Navigation systems
//!
//! Order inside a frame (chained in `NavigationPlugin`):
//! 1. handle_go_to_location: resolve → request path → `Moving` + MovementStarted
//! 2. advance_walker: walker step, copy pose/progress onto the agent
//! 3. detect_arrival: `Moving` → `Arrived` + Arrived (once)

use bevy::prelude::*;

use super::components::{AgentPose, AgentState, NavigationAgent};
use super::events::{Arrived, GoToLocation, MovementStarted, NavigationFailed};
use super::walker::ActiveWalker;
use crate::locations::LocationRegistry;
use crate::logger::{log, log_error, log_info};
use crate::shared::FrameDelta;

/// System: GoToLocation → Moving
///
/// Unknown ids leave the agent untouched and raise `NavigationFailed`.
/// A command while already `Moving` abandons the current path (cancel-and-replace).
pub fn handle_go_to_location(
    mut commands_in: EventReader<GoToLocation>,
    mut started: EventWriter<MovementStarted>,
    mut failed: EventWriter<NavigationFailed>,
    mut agents: Query<(&mut NavigationAgent, &AgentPose)>,
    mut walker: ResMut<ActiveWalker>,
    registry: Res<LocationRegistry>,
) {
    for command in commands_in.read() {
        let Ok((mut agent, pose)) = agents.single_mut() else {
            log_error("GoToLocation: no navigation agent in scene");
            continue;
        };

        let target = match registry.resolve(&command.location_id) {
            Ok(target) => target,
            Err(error) => {
                log_error(&format!("❌ {}", error));
                failed.write(NavigationFailed { error });
                continue;
            }
        };

        let replaced = agent.is_moving();
        if replaced {
            log_info(&format!(
                "Navigation: abandoning path to {:?} for {}",
                agent.destination, command.location_id
            ));
        }

        let stopping_distance = agent.default_stopping_distance;
        walker.0.request_path(pose.position, target, stopping_distance);

        agent.state = AgentState::Moving {
            target,
            stopping_distance,
        };
        agent.destination = Some(command.location_id.clone());
        // No arrival check until the solver has answered
        agent.path_pending = true;

        log_info(&format!(
            "🚶 Navigation: {} → {:?} (stopping distance {:.2})",
            command.location_id, target, stopping_distance
        ));

        started.write(MovementStarted {
            location_id: command.location_id.clone(),
            target,
            replaced,
        });
    }
}

/// System: advance the walker and mirror its status on the agent
pub fn advance_walker(
    mut agents: Query<(&mut NavigationAgent, &mut AgentPose)>,
    mut walker: ResMut<ActiveWalker>,
    delta: Res<FrameDelta>,
) {
    let Ok((mut agent, mut pose)) = agents.single_mut() else {
        return;
    };

    walker.0.advance(delta.0);
    let status = walker.0.status();

    pose.position = status.position;
    pose.rotation = status.facing;
    agent.path_pending = status.path_pending;
    agent.remaining_distance = status.remaining_distance;
}

/// System: Moving → Arrived
///
/// Skipped while the solver is pending; no timeout (a solver that never
/// answers keeps the agent `Moving`).
pub fn detect_arrival(
    mut agents: Query<(&mut NavigationAgent, &AgentPose)>,
    mut arrived: EventWriter<Arrived>,
) {
    let Ok((mut agent, pose)) = agents.single_mut() else {
        return;
    };

    let AgentState::Moving {
        stopping_distance, ..
    } = agent.state
    else {
        return;
    };

    if agent.path_pending {
        return;
    }

    if !agent.has_arrived(stopping_distance) {
        return;
    }

    agent.state = AgentState::Arrived;
    let location_id = agent.destination.clone().unwrap_or_default();

    log(&format!(
        "✅ Navigation: arrived at {} (remaining {:.2})",
        location_id, agent.remaining_distance
    ));

    arrived.write(Arrived {
        location_id,
        position: pose.position,
    });
}
