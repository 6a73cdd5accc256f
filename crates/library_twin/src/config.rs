//! Twin configuration (TOML)
//!
//! Every section is optional; missing keys fall back to the scene defaults the
//! library twin ships with. See `config/twin.toml` for the full layout.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::ConfigError;

/// Complete twin configuration (inserted as a resource at startup)
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwinConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub walker: WalkerConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl TwinConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.simulation.tick_hz > 0.0) {
            return Err(ConfigError::invalid("simulation.tick_hz", "must be > 0"));
        }
        if !(self.navigation.stopping_distance >= 0.0) {
            return Err(ConfigError::invalid("navigation.stopping_distance", "must be >= 0"));
        }
        if !(self.navigation.arrival_floor >= 0.0) {
            return Err(ConfigError::invalid("navigation.arrival_floor", "must be >= 0"));
        }
        if !(self.walker.speed > 0.0) {
            return Err(ConfigError::invalid("walker.speed", "must be > 0"));
        }
        if !(self.camera.position_smoothing_time > 0.0) {
            return Err(ConfigError::invalid("camera.position_smoothing_time", "must be > 0"));
        }
        if !(self.camera.rotation_smoothing_rate > 0.0) {
            return Err(ConfigError::invalid("camera.rotation_smoothing_rate", "must be > 0"));
        }
        if !(self.camera.overview_transition_time >= 0.0) {
            return Err(ConfigError::invalid("camera.overview_transition_time", "must be >= 0"));
        }
        if !(self.bridge.settle_delay_secs >= 0.0) {
            return Err(ConfigError::invalid("bridge.settle_delay_secs", "must be >= 0"));
        }
        if self.effects.trail_max_points == 0 {
            return Err(ConfigError::invalid("effects.trail_max_points", "must be > 0"));
        }
        Ok(())
    }

    /// Frame delta for the configured fixed cadence
    pub fn tick_delta(&self) -> f32 {
        1.0 / self.simulation.tick_hz
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Frame cadence of the embedding runtime
    pub tick_hz: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { tick_hz: 60.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Stopping distance applied to every new destination
    pub stopping_distance: f32,
    /// Absolute arrival floor for solvers that never report exactly zero
    pub arrival_floor: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            stopping_distance: 1.5,
            arrival_floor: 0.5,
        }
    }
}

/// Headless straight-line walker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Metres per second
    pub speed: f32,
    /// Frames the solver keeps `path_pending` after a request
    pub solver_frames: u32,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            speed: 3.5,
            solver_frames: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Chase offset in agent-local space (+Z is behind the agent)
    pub follow_offset: [f32; 3],
    /// SmoothDamp time for the chase position (higher = lazier)
    pub position_smoothing_time: f32,
    /// Slerp rate, multiplied by the frame delta
    pub rotation_smoothing_rate: f32,
    /// Height above the agent origin the chase camera looks at
    pub look_height: f32,
    /// SmoothDamp time toward the overview point, 0 snaps
    pub overview_transition_time: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_offset: [0.0, 5.0, 7.0],
            position_smoothing_time: 0.5,
            rotation_smoothing_rate: 2.0,
            look_height: 1.5,
            overview_transition_time: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Wait after readiness before the first command is forwarded
    pub settle_delay_secs: f32,
    /// One destination per session
    pub one_shot: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            settle_delay_secs: 1.0,
            one_shot: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub trail_min_vertex_distance: f32,
    pub trail_max_points: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            trail_min_vertex_distance: 0.1,
            trail_max_points: 512,
        }
    }
}

/// Scene-authored data: spawn point, overview vantage, shelf locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub agent_spawn: [f32; 3],
    pub overview_point: [f32; 3],
    pub locations: BTreeMap<String, [f32; 3]>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let locations = [
            ("Rack_A_Shelf_1", [10.0, 0.0, 5.0]),
            ("Rack_A_Shelf_2", [10.0, 0.0, 9.0]),
            ("Rack_B_Shelf_1", [-8.0, 0.0, 12.0]),
            ("Rack_B_Shelf_2", [-8.0, 0.0, 16.0]),
            ("Reading_Area", [0.0, 0.0, -10.0]),
        ]
        .into_iter()
        .map(|(id, point)| (id.to_string(), point))
        .collect();

        Self {
            agent_spawn: [0.0, 0.0, 0.0],
            overview_point: [0.0, 18.0, -14.0],
            locations,
        }
    }
}
