//! TwinSimulation: the embedding-runtime side of a session
//!
//! Owns the Bevy App, the scene and the twin end of the command bridge.
//! The runtime calls `tick` once per frame and forwards its loader signals
//! (`report_load_progress`, `report_ready`); the host talks only through the
//! `HostHandle` returned by the constructor.

use bevy::prelude::*;

use crate::bridge::{bridge_channel, BridgePlugin, CommandBridge, HostHandle};
use crate::camera::{CameraDirector, CameraMode, CameraPose};
use crate::config::TwinConfig;
use crate::effects::VisualCues;
use crate::errors::ConfigError;
use crate::logger::log_info;
use crate::navigation::{AgentPose, AgentState, MeshWalker, NavigationAgent, StraightLineWalker};
use crate::{create_headless_app, spawn_scene, tick_app, SceneEntities, SimulationPlugin};

pub struct TwinSimulation {
    app: App,
    scene: SceneEntities,
    tick_delta: f32,
    frame: u64,
}

impl TwinSimulation {
    /// Session with the headless straight-line walker
    pub fn new(config: TwinConfig) -> Result<(Self, HostHandle), ConfigError> {
        let walker = StraightLineWalker::new(Vec3::from_array(config.scene.agent_spawn), &config.walker);
        Self::with_walker(config, walker)
    }

    /// Session with a runtime-provided walker
    pub fn with_walker(
        config: TwinConfig,
        walker: impl MeshWalker + 'static,
    ) -> Result<(Self, HostHandle), ConfigError> {
        config.validate()?;

        let (host, endpoint) = bridge_channel();

        let mut app = create_headless_app();
        app.add_plugins((SimulationPlugin, BridgePlugin));
        app.insert_resource(CommandBridge::new(endpoint, &config.bridge));

        let scene = spawn_scene(app.world_mut(), &config, walker);
        log_info("TwinSimulation ready: waiting for the runtime loader");

        let twin = Self {
            app,
            scene,
            tick_delta: config.tick_delta(),
            frame: 0,
        };
        Ok((twin, host))
    }

    /// One frame with an explicit delta (seconds)
    pub fn tick(&mut self, delta: f32) {
        tick_app(&mut self.app, delta);
        self.frame += 1;
    }

    /// One frame at the configured cadence
    pub fn step(&mut self) {
        self.tick(self.tick_delta);
    }

    pub fn report_load_progress(&mut self, progress: f32) -> f32 {
        self.bridge_mut().report_load_progress(progress)
    }

    pub fn report_ready(&mut self) {
        self.bridge_mut().report_ready();
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn scene(&self) -> SceneEntities {
        self.scene
    }

    pub fn bridge(&self) -> &CommandBridge {
        self.app.world().resource::<CommandBridge>()
    }

    fn bridge_mut(&mut self) -> Mut<'_, CommandBridge> {
        self.app.world_mut().resource_mut::<CommandBridge>()
    }

    /// Agent components
    ///
    /// # Panics
    ///
    /// The scene accessors (`agent*`, `camera*`) panic if the scene entity
    /// or its component was removed through [`TwinSimulation::app_mut`]. The
    /// twin itself never despawns them.
    pub fn agent(&self) -> &NavigationAgent {
        self.component::<NavigationAgent>(self.scene.agent)
    }

    pub fn agent_state(&self) -> &AgentState {
        &self.agent().state
    }

    pub fn agent_pose(&self) -> AgentPose {
        *self.component::<AgentPose>(self.scene.agent)
    }

    /// Director state (panics like [`TwinSimulation::agent`])
    pub fn camera(&self) -> &CameraDirector {
        self.component::<CameraDirector>(self.scene.camera)
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera().mode
    }

    pub fn camera_pose(&self) -> CameraPose {
        *self.component::<CameraPose>(self.scene.camera)
    }

    pub fn visual_cues(&self) -> &VisualCues {
        self.app.world().resource::<VisualCues>()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Raw world access; despawning scene entities breaks the scene accessors
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    // Scene entities are spawned in the constructor and never despawned by the twin
    fn component<T: Component>(&self, entity: Entity) -> &T {
        self.app
            .world()
            .get::<T>(entity)
            .expect("scene entity lost a core component")
    }
}
