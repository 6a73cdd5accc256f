//! Bridge systems

use bevy::prelude::*;

use super::{CommandBridge, HostMessage, TwinMessage};
use crate::logger::{log_info, log_warning};
use crate::navigation::{Arrived, GoToLocation, NavigationFailed};
use crate::shared::FrameDelta;

/// System: drain host payloads into the bridge queue
pub fn receive_host_commands(mut bridge: ResMut<CommandBridge>) {
    for message in bridge.drain_inbound() {
        match message {
            Ok(HostMessage::GoToLocation { location_id }) => {
                bridge.request_go_to_location(location_id);
            }
            Err(e) => log_warning(&format!("Bridge: {}", e)),
        }
    }
}

/// System: forward the queued destination once ready + settled
pub fn dispatch_pending_command(
    mut bridge: ResMut<CommandBridge>,
    mut go_to: EventWriter<GoToLocation>,
    delta: Res<FrameDelta>,
) {
    let Some(location_id) = bridge.tick(delta.0) else {
        return;
    };

    log_info(&format!("📨 Bridge: dispatching GoToLocation -> {}", location_id));
    go_to.write(GoToLocation { location_id });
}

/// System: navigation outcome → host (errors are never retried)
pub fn report_navigation_outcome(
    mut bridge: ResMut<CommandBridge>,
    mut arrived: EventReader<Arrived>,
    mut failed: EventReader<NavigationFailed>,
) {
    for event in failed.read() {
        bridge.notify(&TwinMessage::Error {
            reason: event.error.to_string(),
        });
    }

    for event in arrived.read() {
        bridge.notify(&TwinMessage::Arrived {
            location_id: event.location_id.clone(),
        });
    }
}
