//! Test helpers: scripted walker, event journal, minimal scene app

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::events::{Arrived, MovementStarted, NavigationFailed};
use super::walker::{MeshWalker, WalkerStatus};
use crate::config::TwinConfig;
use crate::{create_headless_app, spawn_scene, tick_app, SceneEntities, SimulationPlugin, TwinSet};

#[derive(Debug, Default)]
struct Script {
    position: Vec3,
    facing: Quat,
    path_pending: bool,
    remaining_distance: f32,
    requests: Vec<(Vec3, Vec3)>,
}

/// Walker whose solver output is set by the test
///
/// Clones share state, so a test keeps one handle after the walker has been
/// moved into the world.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWalker {
    script: Arc<Mutex<Script>>,
}

impl ScriptedWalker {
    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    pub fn solve(&self, remaining_distance: f32) {
        let mut script = self.script();
        script.path_pending = false;
        script.remaining_distance = remaining_distance;
    }

    pub fn set_position(&self, position: Vec3) {
        self.script().position = position;
    }

    pub fn set_facing(&self, facing: Quat) {
        self.script().facing = facing;
    }

    pub fn requests(&self) -> Vec<(Vec3, Vec3)> {
        self.script().requests.clone()
    }
}

impl MeshWalker for ScriptedWalker {
    fn request_path(&mut self, from: Vec3, to: Vec3, _stopping_distance: f32) {
        let mut script = self.script();
        script.requests.push((from, to));
        script.path_pending = true;
        script.remaining_distance = from.distance(to);
    }

    fn advance(&mut self, _delta: f32) {}

    fn status(&self) -> WalkerStatus {
        let script = self.script();
        WalkerStatus {
            position: script.position,
            facing: script.facing,
            path_pending: script.path_pending,
            remaining_distance: script.remaining_distance,
        }
    }
}

/// Every navigation event seen, in order
#[derive(Resource, Debug, Default)]
pub struct Journal {
    pub started: Vec<MovementStarted>,
    pub arrived: Vec<Arrived>,
    pub failed: Vec<NavigationFailed>,
}

fn record_events(
    mut journal: ResMut<Journal>,
    mut started: EventReader<MovementStarted>,
    mut arrived: EventReader<Arrived>,
    mut failed: EventReader<NavigationFailed>,
) {
    journal.started.extend(started.read().cloned());
    journal.arrived.extend(arrived.read().cloned());
    journal.failed.extend(failed.read().cloned());
}

pub const DT: f32 = 1.0 / 60.0;

/// Scene with a single `Rack_A_Shelf_1` at (10, 0, 5) and a second shelf
pub fn test_config() -> TwinConfig {
    let mut config = TwinConfig::default();
    config.scene.locations = BTreeMap::from([
        ("Rack_A_Shelf_1".to_string(), [10.0, 0.0, 5.0]),
        ("Rack_B_Shelf_2".to_string(), [-8.0, 0.0, 16.0]),
    ]);
    config
}

pub fn build_app(config: &TwinConfig, walker: &ScriptedWalker) -> (App, SceneEntities) {
    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin)
        .init_resource::<Journal>()
        .add_systems(Update, record_events.after(TwinSet::Report));

    let scene = spawn_scene(app.world_mut(), config, walker.clone());
    (app, scene)
}

pub fn tick(app: &mut App) {
    tick_app(app, DT);
}
