//! Location registry: symbolic shelf ids → world points
//!
//! Populated once at scene load, read-only afterwards.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::config::SceneConfig;
use crate::errors::NavigationError;


/// Read-only mapping from location identifier to world point
#[derive(Resource, Debug, Clone, Default)]
pub struct LocationRegistry {
    points: HashMap<String, Vec3>,
}

impl LocationRegistry {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec3)>,
        S: Into<String>,
    {
        Self {
            points: entries
                .into_iter()
                .map(|(id, point)| (id.into(), point))
                .collect(),
        }
    }

    pub fn from_scene(scene: &SceneConfig) -> Self {
        Self::from_entries(
            scene
                .locations
                .iter()
                .map(|(id, point)| (id.clone(), Vec3::from_array(*point))),
        )
    }

    /// Exact-match lookup (ids are case sensitive, no trimming)
    pub fn resolve(&self, location_id: &str) -> Result<Vec3, NavigationError> {
        self.points
            .get(location_id)
            .copied()
            .ok_or_else(|| NavigationError::LocationNotFound {
                location_id: location_id.to_string(),
            })
    }

    pub fn contains(&self, location_id: &str) -> bool {
        self.points.contains_key(location_id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sorted ids (stable order for logs and tests)
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.points.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
