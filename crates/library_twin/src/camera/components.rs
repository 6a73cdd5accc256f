//! Camera director components

use bevy::prelude::*;

use crate::config::CameraConfig;

/// Director mode
///
/// Switched only by navigation transitions:
/// - MovementStarted → Chase
/// - Arrived → Overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Lagged follow behind/above the agent
    #[default]
    Chase,
    /// Fixed vantage point looking at the agent
    Overview,
}

/// Camera director state (one per scene)
#[derive(Component, Debug, Clone)]
pub struct CameraDirector {
    pub mode: CameraMode,
    /// Agent-local offset for the chase position
    pub follow_offset: Vec3,
    /// SmoothDamp time (> 0)
    pub position_smoothing_time: f32,
    /// Slerp rate per second (> 0)
    pub rotation_smoothing_rate: f32,
    /// Chase look-at height above the agent origin
    pub look_height: f32,
    /// Scene-authored overview vantage
    pub overview_point: Vec3,
    /// 0 snaps to the overview point
    pub overview_transition_time: f32,
    /// SmoothDamp accumulator, mutated every frame
    pub current_velocity: Vec3,
}

impl CameraDirector {
    pub fn from_config(config: &CameraConfig, overview_point: Vec3) -> Self {
        Self {
            mode: CameraMode::Chase,
            follow_offset: Vec3::from_array(config.follow_offset),
            position_smoothing_time: config.position_smoothing_time,
            rotation_smoothing_rate: config.rotation_smoothing_rate,
            look_height: config.look_height,
            overview_point,
            overview_transition_time: config.overview_transition_time,
            current_velocity: Vec3::ZERO,
        }
    }

    pub fn chase_look_target(&self, agent_position: Vec3) -> Vec3 {
        agent_position + Vec3::Y * self.look_height
    }
}

impl Default for CameraDirector {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), Vec3::new(0.0, 18.0, -14.0))
    }
}

/// World pose of the director camera
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// −Z forward
    pub rotation: Quat,
}

impl CameraPose {
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}
