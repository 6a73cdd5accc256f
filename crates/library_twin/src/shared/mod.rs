//! Shared domain: frame clock and orientation helpers used by several domains

use bevy::prelude::*;

/// Frame delta handed over by the embedding runtime (seconds)
///
/// The runtime owns the clock: it inserts this resource before every
/// `App::update`, so every system of a frame sees the same delta.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta(pub f32);

impl Default for FrameDelta {
    fn default() -> Self {
        Self(1.0 / 60.0)
    }
}

/// Rotation looking along `direction` with `up` as the vertical hint
///
/// −Z is forward, +Y is up. Returns `None` for a zero (or non-finite)
/// direction; callers hold their previous orientation in that case.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize()?;
    let back = -forward;
    let right = up
        .cross(back)
        .try_normalize()
        .unwrap_or_else(|| back.any_orthonormal_vector());
    let up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)))
}
