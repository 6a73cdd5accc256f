//! Visual cues: path trail, head spotlight, sky beam
//!
//! Pure side-effect consumer of navigation transitions. Nothing reads these
//! back except the renderer (and tests).

use bevy::prelude::*;

use crate::config::EffectsConfig;
use crate::logger::log;
use crate::navigation::{AgentPose, Arrived, MovementStarted};
use crate::TwinSet;

/// Effects Plugin
pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VisualCues>().add_systems(
            Update,
            (toggle_visual_cues, sample_trail)
                .chain()
                .in_set(TwinSet::Effects),
        );
    }
}

/// Ambient cue state
///
/// Everything starts off: cues must be disabled before any command can arrive.
#[derive(Resource, Debug, Clone)]
pub struct VisualCues {
    pub trail_enabled: bool,
    pub spotlight_on: bool,
    pub beam_active: bool,
    /// Sampled agent positions, oldest first
    pub trail: Vec<Vec3>,
    pub trail_min_vertex_distance: f32,
    pub trail_max_points: usize,
}

impl VisualCues {
    pub fn from_config(config: &EffectsConfig) -> Self {
        Self {
            trail_enabled: false,
            spotlight_on: false,
            beam_active: false,
            trail: Vec::new(),
            trail_min_vertex_distance: config.trail_min_vertex_distance,
            trail_max_points: config.trail_max_points.max(1),
        }
    }

    fn on_movement_started(&mut self) {
        self.spotlight_on = false;
        self.beam_active = false;
        self.trail.clear();
        self.trail_enabled = true;
    }

    fn on_arrived(&mut self) {
        self.beam_active = true;
        self.spotlight_on = true;
    }

    fn push_trail_point(&mut self, point: Vec3) {
        let far_enough = self
            .trail
            .last()
            .map_or(true, |last| last.distance(point) >= self.trail_min_vertex_distance);
        if !far_enough {
            return;
        }

        if self.trail.len() >= self.trail_max_points {
            let overflow = self.trail.len() + 1 - self.trail_max_points;
            self.trail.drain(..overflow);
        }
        self.trail.push(point);
    }
}

impl Default for VisualCues {
    fn default() -> Self {
        Self::from_config(&EffectsConfig::default())
    }
}

/// System: cue toggles on navigation transitions
///
/// A replacement walk (cancel-and-replace) resets the cues immediately.
pub fn toggle_visual_cues(
    mut started: EventReader<MovementStarted>,
    mut arrived: EventReader<Arrived>,
    mut cues: ResMut<VisualCues>,
) {
    for event in started.read() {
        cues.on_movement_started();
        log(&format!("✨ Effects: trail on, beam/spotlight off ({})", event.location_id));
    }

    for event in arrived.read() {
        cues.on_arrived();
        log(&format!("✨ Effects: beam + spotlight on ({})", event.location_id));
    }
}

/// System: record the agent position into the trail while it is enabled
pub fn sample_trail(agents: Query<&AgentPose>, mut cues: ResMut<VisualCues>) {
    if !cues.trail_enabled {
        return;
    }

    let Ok(pose) = agents.single() else {
        return;
    };

    cues.push_trail_point(pose.position);
}
