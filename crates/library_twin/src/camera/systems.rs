//! Camera director systems

use bevy::prelude::*;

use super::components::{CameraDirector, CameraMode, CameraPose};
use super::smoothing::{rotation_step, smooth_damp};
use crate::logger::log;
use crate::navigation::{AgentPose, Arrived, MovementStarted};
use crate::shared::{look_rotation, FrameDelta};

/// System: edge-triggered mode switch
///
/// Starts are applied before arrivals: within one frame an arrival is always
/// detected after the command that started the walk.
pub fn switch_camera_mode(
    mut started: EventReader<MovementStarted>,
    mut arrived: EventReader<Arrived>,
    mut cameras: Query<&mut CameraDirector>,
) {
    let mut next_mode = None;
    if started.read().count() > 0 {
        next_mode = Some(CameraMode::Chase);
    }
    if arrived.read().count() > 0 {
        next_mode = Some(CameraMode::Overview);
    }

    let Some(next_mode) = next_mode else {
        return;
    };

    for mut director in cameras.iter_mut() {
        if director.mode != next_mode {
            log(&format!("🎥 Camera: {:?} → {:?}", director.mode, next_mode));
            director.mode = next_mode;
        }
    }
}

/// System: per-frame camera pose
///
/// Chase: SmoothDamp toward the agent-local follow offset, slerp toward the
/// look target above the agent.
/// Overview: snap (or SmoothDamp) to the overview point, slerp toward the agent.
/// A zero look vector, or a non-finite or non-positive delta, holds the
/// previous pose.
pub fn update_camera_director(
    agents: Query<&AgentPose>,
    mut cameras: Query<(&mut CameraDirector, &mut CameraPose)>,
    delta: Res<FrameDelta>,
) {
    let delta = delta.0;
    // A bad runtime delta skips the frame: the camera holds its last pose
    if !(delta.is_finite() && delta > 0.0) {
        return;
    }

    let Ok(agent) = agents.single() else {
        return;
    };

    for (mut director, mut pose) in cameras.iter_mut() {
        let look_target = match director.mode {
            CameraMode::Chase => {
                let desired = agent.transform_point(director.follow_offset);
                let (position, velocity) = smooth_damp(
                    pose.position,
                    desired,
                    director.current_velocity,
                    director.position_smoothing_time,
                    delta,
                );
                pose.position = position;
                director.current_velocity = velocity;
                director.chase_look_target(agent.position)
            }
            CameraMode::Overview => {
                if director.overview_transition_time > 0.0 {
                    let (position, velocity) = smooth_damp(
                        pose.position,
                        director.overview_point,
                        director.current_velocity,
                        director.overview_transition_time,
                        delta,
                    );
                    pose.position = position;
                    director.current_velocity = velocity;
                } else {
                    pose.position = director.overview_point;
                    director.current_velocity = Vec3::ZERO;
                }
                agent.position
            }
        };

        let Some(desired_rotation) = look_rotation(look_target - pose.position, Vec3::Y) else {
            continue;
        };

        let t = rotation_step(director.rotation_smoothing_rate, delta);
        pose.rotation = pose.rotation.slerp(desired_rotation, t).normalize();
    }
}
