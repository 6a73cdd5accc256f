//! End-to-end sessions through the host bridge
//!
//! Covers:
//! - premature host request → queued → one dispatch after ready + settle delay
//! - walk to the shelf, Arrived reported to the host exactly once
//! - unknown location → exactly one error, agent untouched
//! - one-shot policy and its relaxed variant

use bevy::prelude::*;
use library_twin::*;

const SHELF: Vec3 = Vec3::new(10.0, 0.0, 5.0);

/// Loader ramp: progress every frame, 1.0 on the last one (ready is separate)
fn load(twin: &mut TwinSimulation, frames: u32) {
    for frame in 1..=frames {
        twin.report_load_progress(frame as f32 / frames as f32);
        twin.step();
    }
}

/// Steps until the host receives an arrival (or `max_frames` ran out)
fn walk_until_arrived(
    twin: &mut TwinSimulation,
    host: &mut HostHandle,
    max_frames: u32,
) -> Vec<TwinMessage> {
    let mut seen = Vec::new();
    for _ in 0..max_frames {
        twin.step();
        let batch = host.poll();
        let arrived = count_arrivals(&batch) > 0;
        seen.extend(batch);
        if arrived {
            break;
        }
    }
    seen
}

fn count_arrivals(messages: &[TwinMessage]) -> usize {
    messages
        .iter()
        .filter(|message| matches!(message, TwinMessage::Arrived { .. }))
        .count()
}

fn quick_config() -> TwinConfig {
    let mut config = TwinConfig::default();
    config.bridge.settle_delay_secs = 0.0;
    config
}

#[test]
fn test_premature_request_dispatched_once_after_settle() {
    let (mut twin, mut host) = TwinSimulation::new(TwinConfig::default()).unwrap();

    // Host asks before the runtime has even started loading
    host.request_go_to_location("Rack_A_Shelf_1").unwrap();

    load(&mut twin, 30);
    assert!(!twin.bridge().is_ready());
    assert!(!twin.bridge().is_dispatched());
    assert_eq!(*twin.agent_state(), AgentState::Idle);

    let progress: Vec<f32> = host
        .poll()
        .into_iter()
        .filter_map(|message| match message {
            TwinMessage::LoadProgress { progress } => Some(progress),
            _ => None,
        })
        .collect();
    assert_eq!(progress.len(), 30);
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(host.observed_progress(), 1.0);

    twin.report_ready();

    // 1 s settle delay at 60 Hz: dispatched on exactly the 60th frame
    for _ in 0..59 {
        twin.step();
        assert!(!twin.bridge().is_dispatched());
        assert_eq!(*twin.agent_state(), AgentState::Idle);
    }
    twin.step();
    assert!(twin.bridge().is_dispatched());
    assert!(twin.agent().is_moving());
    assert_eq!(twin.camera_mode(), CameraMode::Chase);
    assert!(twin.visual_cues().trail_enabled);

    let mut seen = walk_until_arrived(&mut twin, &mut host, 600);
    assert!(host.is_ready());
    assert_eq!(host.arrived_at(), Some("Rack_A_Shelf_1"));
    assert!(host.errors().is_empty());

    // Arrived is terminal: nothing more is reported
    for _ in 0..120 {
        twin.step();
        seen.extend(host.poll());
    }
    assert_eq!(count_arrivals(&seen), 1);

    assert_eq!(*twin.agent_state(), AgentState::Arrived);
    assert!(twin.agent_pose().position.distance(SHELF) <= 1.5);
    assert_eq!(twin.camera_mode(), CameraMode::Overview);
    assert_eq!(twin.camera_pose().position, Vec3::new(0.0, 18.0, -14.0));

    let cues = twin.visual_cues();
    assert!(cues.beam_active);
    assert!(cues.spotlight_on);
    assert!(cues.trail.len() > 10);
}

#[test]
fn test_unknown_location_reported_once() {
    let (mut twin, mut host) = TwinSimulation::new(quick_config()).unwrap();

    host.request_go_to_location("Rack_Z_Shelf_9").unwrap();
    load(&mut twin, 5);
    twin.report_ready();
    for _ in 0..60 {
        twin.step();
    }
    host.poll();

    assert!(twin.bridge().is_dispatched());
    assert_eq!(host.errors(), ["location not found: Rack_Z_Shelf_9".to_string()]);
    assert_eq!(host.arrived_at(), None);

    assert_eq!(*twin.agent_state(), AgentState::Idle);
    assert_eq!(twin.agent_pose().position, Vec3::ZERO);
    assert_eq!(twin.camera_mode(), CameraMode::Chase);
    assert!(!twin.visual_cues().trail_enabled);
    assert!(!twin.visual_cues().beam_active);
}

#[test]
fn test_one_shot_ignores_second_request() {
    let (mut twin, mut host) = TwinSimulation::new(quick_config()).unwrap();

    host.request_go_to_location("Rack_A_Shelf_1").unwrap();
    load(&mut twin, 5);
    twin.report_ready();
    walk_until_arrived(&mut twin, &mut host, 600);
    assert_eq!(host.arrived_at(), Some("Rack_A_Shelf_1"));

    host.request_go_to_location("Rack_B_Shelf_2").unwrap();
    let mut seen = Vec::new();
    for _ in 0..120 {
        twin.step();
        seen.extend(host.poll());
    }

    assert!(seen.is_empty());
    assert_eq!(*twin.agent_state(), AgentState::Arrived);
    assert_eq!(twin.agent().destination.as_deref(), Some("Rack_A_Shelf_1"));
}

#[test]
fn test_relaxed_policy_walks_again() {
    let mut config = quick_config();
    config.bridge.one_shot = false;
    let (mut twin, mut host) = TwinSimulation::new(config).unwrap();

    host.request_go_to_location("Rack_A_Shelf_1").unwrap();
    load(&mut twin, 5);
    twin.report_ready();
    walk_until_arrived(&mut twin, &mut host, 600);

    host.request_go_to_location("Reading_Area").unwrap();
    twin.step();
    assert!(twin.agent().is_moving());
    assert_eq!(twin.camera_mode(), CameraMode::Chase);
    // Cues reset for the new walk
    assert!(!twin.visual_cues().beam_active);
    assert!(!twin.visual_cues().spotlight_on);

    walk_until_arrived(&mut twin, &mut host, 900);
    assert_eq!(host.arrived_at(), Some("Reading_Area"));
    assert_eq!(twin.camera_mode(), CameraMode::Overview);
}

#[test]
fn test_malformed_payload_does_not_break_session() {
    let (mut twin, mut host) = TwinSimulation::new(quick_config()).unwrap();

    host.send_raw("{\"type\":\"teleport\"}".to_string()).unwrap();
    host.send_raw("not json".to_string()).unwrap();
    host.request_go_to_location("Rack_A_Shelf_1").unwrap();

    load(&mut twin, 5);
    twin.report_ready();
    walk_until_arrived(&mut twin, &mut host, 600);

    assert_eq!(host.arrived_at(), Some("Rack_A_Shelf_1"));
    assert!(host.errors().is_empty());
}

#[test]
fn test_twin_survives_host_drop() {
    let (mut twin, host) = TwinSimulation::new(quick_config()).unwrap();
    drop(host);

    load(&mut twin, 5);
    twin.report_ready();
    for _ in 0..60 {
        twin.step();
    }

    assert!(twin.bridge().is_ready());
    assert!(!twin.bridge().is_dispatched());
    assert_eq!(twin.frame(), 65);
}

#[test]
fn test_host_sees_twin_shutdown() {
    let (mut twin, mut host) = TwinSimulation::new(quick_config()).unwrap();
    twin.report_ready();
    drop(twin);

    // Buffered reports are still delivered first
    assert_eq!(host.poll(), vec![TwinMessage::Ready]);
    assert!(!host.is_twin_connected());
    assert!(host.request_go_to_location("Rack_A_Shelf_1").is_err());
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = TwinConfig::default();
    config.camera.position_smoothing_time = 0.0;

    let result = TwinSimulation::new(config);
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
#[should_panic(expected = "scene entity lost a core component")]
fn test_scene_accessor_panics_on_despawned_agent() {
    let (mut twin, _host) = TwinSimulation::new(TwinConfig::default()).unwrap();
    let agent = twin.scene().agent;
    assert!(twin.app_mut().world_mut().despawn(agent));

    twin.agent_pose();
}
