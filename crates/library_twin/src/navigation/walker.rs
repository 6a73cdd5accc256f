//! Mesh-walker capability
//!
//! The walker owns pathfinding and locomotion; the navigation systems only
//! request paths and poll `path_pending` / `remaining_distance`. Engine
//! integrations implement [`MeshWalker`] over their navmesh agent; headless
//! runs use [`StraightLineWalker`].

use bevy::prelude::*;

use crate::config::WalkerConfig;
use crate::shared::look_rotation;

/// Snapshot polled once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkerStatus {
    pub position: Vec3,
    pub facing: Quat,
    pub path_pending: bool,
    pub remaining_distance: f32,
}

pub trait MeshWalker: Send + Sync {
    /// Replaces any route in progress; the walker brakes `stopping_distance` short of `to`
    fn request_path(&mut self, from: Vec3, to: Vec3, stopping_distance: f32);

    /// Moves the walker along its route
    fn advance(&mut self, delta: f32);

    fn status(&self) -> WalkerStatus;
}

/// The walker driving the session agent
#[derive(Resource)]
pub struct ActiveWalker(pub Box<dyn MeshWalker>);

impl ActiveWalker {
    pub fn new(walker: impl MeshWalker + 'static) -> Self {
        Self(Box::new(walker))
    }
}

/// Braking lands this far inside the stopping distance
const BRAKE_TOLERANCE: f32 = 1e-3;

/// Headless stand-in: walks a straight line after a fixed solver latency
#[derive(Debug, Clone)]
pub struct StraightLineWalker {
    position: Vec3,
    facing: Quat,
    target: Option<Vec3>,
    stopping_distance: f32,
    speed: f32,
    solver_frames: u32,
    frames_until_solved: u32,
}

impl StraightLineWalker {
    pub fn new(spawn: Vec3, config: &WalkerConfig) -> Self {
        Self {
            position: spawn,
            facing: Quat::IDENTITY,
            target: None,
            stopping_distance: 0.0,
            speed: config.speed,
            solver_frames: config.solver_frames,
            frames_until_solved: 0,
        }
    }

    fn remaining(&self) -> f32 {
        self.target
            .map(|target| self.position.distance(target))
            .unwrap_or(0.0)
    }
}

impl MeshWalker for StraightLineWalker {
    fn request_path(&mut self, from: Vec3, to: Vec3, stopping_distance: f32) {
        self.position = from;
        self.target = Some(to);
        self.stopping_distance = stopping_distance.max(0.0);
        self.frames_until_solved = self.solver_frames;
    }

    fn advance(&mut self, delta: f32) {
        let Some(target) = self.target else {
            return;
        };
        if !(delta.is_finite() && delta > 0.0) {
            return;
        }

        if self.frames_until_solved > 0 {
            self.frames_until_solved -= 1;
            return;
        }

        let to_target = target - self.position;
        let brake_at = (self.stopping_distance - BRAKE_TOLERANCE).max(0.0);
        let travel = to_target.length() - brake_at;
        if travel <= 0.0 {
            return;
        }

        // Face the direction of travel on the ground plane
        if let Some(facing) = look_rotation(Vec3::new(to_target.x, 0.0, to_target.z), Vec3::Y) {
            self.facing = facing;
        }

        let step = self.speed * delta;
        if travel <= step && brake_at == 0.0 {
            self.position = target;
        } else {
            self.position += to_target.normalize() * step.min(travel);
        }
    }

    fn status(&self) -> WalkerStatus {
        WalkerStatus {
            position: self.position,
            facing: self.facing,
            path_pending: self.target.is_some() && self.frames_until_solved > 0,
            remaining_distance: self.remaining(),
        }
    }
}
