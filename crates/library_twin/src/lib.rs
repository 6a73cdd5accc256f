//! Library Twin Simulation Core
//!
//! Headless Bevy ECS control layer of the library digital twin: an agent walks
//! to a requested shelf while a director camera alternates between a chase
//! view and a scene overview.
//!
//! Layers:
//! - host application (web/mobile UI) ↔ `bridge` (JSON over channels)
//! - ECS = control layer (navigation state, camera, visual cues)
//! - embedding runtime = pathfinding + rendering (`MeshWalker`, poses)

use bevy::prelude::*;

pub mod bridge;
pub mod camera;
pub mod config;
pub mod effects;
pub mod errors;
pub mod locations;
pub mod logger;
pub mod navigation;
pub mod shared;
pub mod twin;

pub use bridge::{bridge_channel, BridgePlugin, CommandBridge, HostHandle, HostMessage, TwinMessage};
pub use camera::{CameraDirector, CameraMode, CameraPlugin, CameraPose};
pub use config::TwinConfig;
pub use effects::{EffectsPlugin, VisualCues};
pub use errors::{BridgeError, ConfigError, NavigationError};
pub use locations::LocationRegistry;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use navigation::{
    ActiveWalker, AgentPose, AgentState, Arrived, GoToLocation, MeshWalker, MovementStarted,
    NavigationAgent, NavigationFailed, NavigationPlugin, StraightLineWalker, WalkerStatus,
};
pub use shared::{look_rotation, FrameDelta};
pub use twin::TwinSimulation;

/// Fixed per-frame order
///
/// Camera depends on the agent having settled for the frame; effects depend
/// on the transitions, never the other way round.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwinSet {
    Bridge,
    Navigation,
    Camera,
    Effects,
    Report,
}

/// Main simulation plugin (navigation + camera + effects)
///
/// The command bridge is added separately (`BridgePlugin`) because it needs
/// a live channel endpoint.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameDelta>()
            .configure_sets(
                Update,
                (
                    TwinSet::Bridge,
                    TwinSet::Navigation,
                    TwinSet::Camera,
                    TwinSet::Effects,
                    TwinSet::Report,
                )
                    .chain(),
            )
            .add_plugins((NavigationPlugin, CameraPlugin, EffectsPlugin));
    }
}

/// Creates a minimal Bevy App for a headless twin
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins);
    app
}

/// Runs one frame with the runtime-provided delta
pub fn tick_app(app: &mut App, delta: f32) {
    app.world_mut().insert_resource(FrameDelta(delta));
    app.update();
}

/// Entities of the loaded scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneEntities {
    pub agent: Entity,
    pub camera: Entity,
}

/// Scene load: registry, walker, cues, agent and director camera
///
/// The camera starts in chase mode at the follow offset, already looking at
/// the agent.
pub fn spawn_scene(
    world: &mut World,
    config: &TwinConfig,
    walker: impl MeshWalker + 'static,
) -> SceneEntities {
    let registry = LocationRegistry::from_scene(&config.scene);
    log_info(&format!(
        "Scene: {} locations registered {:?}",
        registry.len(),
        registry.ids()
    ));

    let spawn_pose = AgentPose::at(walker.status().position);

    world.insert_resource(registry);
    world.insert_resource(ActiveWalker::new(walker));
    world.insert_resource(VisualCues::from_config(&config.effects));

    let agent = world
        .spawn((
            NavigationAgent::new(
                config.navigation.stopping_distance,
                config.navigation.arrival_floor,
            ),
            spawn_pose,
        ))
        .id();

    let director = CameraDirector::from_config(
        &config.camera,
        Vec3::from_array(config.scene.overview_point),
    );
    let camera_position = spawn_pose.transform_point(director.follow_offset);
    let camera_rotation = look_rotation(
        director.chase_look_target(spawn_pose.position) - camera_position,
        Vec3::Y,
    )
    .unwrap_or(Quat::IDENTITY);

    let camera = world
        .spawn((
            director,
            CameraPose {
                position: camera_position,
                rotation: camera_rotation,
            },
        ))
        .id();

    SceneEntities { agent, camera }
}

/// Snapshot of a component across the world (determinism checks)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Entity order is not guaranteed by the query
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
