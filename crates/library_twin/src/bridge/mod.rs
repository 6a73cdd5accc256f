//! Command bridge: the only ingress/egress between the host application and the twin
//!
//! Flow:
//! 1. Runtime loader → `report_load_progress` / `report_ready` → host
//! 2. Host → `GoToLocation` payload → queued until ready + settle delay
//! 3. Bridge → `GoToLocation` event (at most once per session by default)
//! 4. Navigation outcome (`Arrived` / `NavigationFailed`) → host
//!
//! The settle delay is a frame-counted timer, never a blocking sleep.

use bevy::prelude::*;

pub mod messages;
pub mod systems;


pub use messages::{bridge_channel, HostHandle, HostMessage, TwinEndpoint, TwinMessage};
pub use systems::*;

use crate::config::BridgeConfig;
use crate::errors::BridgeError;
use crate::logger::{log, log_info, log_warning};
use crate::TwinSet;

/// Seconds of float drift forgiven by the settle timer
const SETTLE_TOLERANCE: f32 = 1e-4;

/// Bridge Plugin
///
/// Inbound + dispatch run before navigation, reports after effects.
/// Expects a `CommandBridge` resource.
pub struct BridgePlugin;

impl Plugin for BridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (receive_host_commands, dispatch_pending_command)
                .chain()
                .in_set(TwinSet::Bridge),
        )
        .add_systems(Update, report_navigation_outcome.in_set(TwinSet::Report));
    }
}

/// Bridge state
///
/// Invariants:
/// - `ready` flips false → true once
/// - `dispatched` only becomes true after `ready`
/// - `load_progress` never decreases
#[derive(Resource, Debug)]
pub struct CommandBridge {
    ready: bool,
    dispatched: bool,
    load_progress: f32,
    /// Latest request not yet forwarded
    pending: Option<String>,
    settle_delay: f32,
    /// Time since `ready`
    settle_elapsed: f32,
    one_shot: bool,
    endpoint: TwinEndpoint,
    host_disconnected: bool,
}

impl CommandBridge {
    pub fn new(endpoint: TwinEndpoint, config: &BridgeConfig) -> Self {
        Self {
            ready: false,
            dispatched: false,
            load_progress: 0.0,
            pending: None,
            settle_delay: config.settle_delay_secs.max(0.0),
            settle_elapsed: 0.0,
            one_shot: config.one_shot,
            endpoint,
            host_disconnected: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_dispatched(&self) -> bool {
        self.dispatched
    }

    pub fn load_progress(&self) -> f32 {
        self.load_progress
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Stores and forwards the loader progress
    ///
    /// Clamped to [0, 1]; a value lower than the last one is ignored (the last
    /// value is re-reported). Returns the stored value.
    pub fn report_load_progress(&mut self, progress: f32) -> f32 {
        if self.ready {
            log(&format!("Bridge: progress {:.2} after ready ignored", progress));
            return self.load_progress;
        }

        if progress.is_nan() {
            log_warning("Bridge: NaN load progress ignored");
        } else {
            self.load_progress = self.load_progress.max(progress.clamp(0.0, 1.0));
        }

        let stored = self.load_progress;
        self.notify(&TwinMessage::LoadProgress { progress: stored });
        stored
    }

    /// Runtime finished initializing; starts the settle timer
    pub fn report_ready(&mut self) {
        if self.ready {
            log_warning("Bridge: duplicate ready signal ignored");
            return;
        }

        self.ready = true;
        self.load_progress = 1.0;
        self.settle_elapsed = 0.0;
        log_info(&format!(
            "📡 Bridge: runtime ready, settling {:.2}s before dispatch",
            self.settle_delay
        ));
        self.notify(&TwinMessage::Ready);
    }

    /// Queues a destination
    ///
    /// - before ready: queued (a newer request replaces the queued one)
    /// - after a dispatch: ignored under the one-shot policy, otherwise queued
    ///   again and forwarded on the next frame
    pub fn request_go_to_location(&mut self, location_id: impl Into<String>) {
        let location_id = location_id.into();

        if self.dispatched && self.one_shot {
            log(&format!(
                "Bridge: destination already dispatched this session, ignoring {}",
                location_id
            ));
            return;
        }

        if let Some(previous) = self.pending.replace(location_id.clone()) {
            log_info(&format!("Bridge: queued {} replaced by {}", previous, location_id));
        } else if !self.ready {
            log_info(&format!("Bridge: {} queued until the runtime is ready", location_id));
        }
    }

    /// Advances the settle timer; returns the destination to forward, if due
    pub fn tick(&mut self, delta: f32) -> Option<String> {
        if !self.ready {
            return None;
        }

        if !self.is_settled() {
            self.settle_elapsed += delta.max(0.0);
        }
        if !self.is_settled() {
            return None;
        }

        let location_id = self.pending.take()?;
        self.dispatched = true;
        Some(location_id)
    }

    // Summed f32 frame deltas fall a hair short of the delay (60 × 1/60 < 1.0)
    fn is_settled(&self) -> bool {
        self.settle_elapsed + SETTLE_TOLERANCE >= self.settle_delay
    }

    /// Pushes a report to the host (dropped silently once the host is gone)
    pub fn notify(&mut self, message: &TwinMessage) {
        if self.host_disconnected {
            return;
        }

        match self.endpoint.send(message) {
            Ok(()) => {}
            Err(BridgeError::ChannelClosed) => {
                self.host_disconnected = true;
                log_warning("Bridge: host disconnected, reports dropped from now on");
            }
            Err(e) => log_warning(&format!("Bridge: report not sent: {}", e)),
        }
    }

    pub(crate) fn drain_inbound(&mut self) -> Vec<Result<HostMessage, BridgeError>> {
        let (messages, disconnected) = self.endpoint.drain();
        if disconnected && !self.host_disconnected {
            self.host_disconnected = true;
            log_warning("Bridge: host disconnected");
        }
        messages
    }
}
