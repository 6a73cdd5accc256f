//! Critically damped smoothing (SmoothDamp)
//!
//! Spring-damper with damping ratio 1, integrated with a rational
//! approximation of `exp(-ω·dt)` so the result is stable at any frame rate.

use bevy::prelude::*;

/// Lower bound for the smoothing time (avoids ω → ∞)
const MIN_SMOOTH_TIME: f32 = 0.0001;

/// Moves `current` toward `target` over roughly `smooth_time` seconds
///
/// `velocity` is the filter state carried between frames. Returns the new
/// position and velocity. Never overshoots `target`; a non-positive or
/// non-finite `delta` leaves both unchanged.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: Vec3,
    smooth_time: f32,
    delta: f32,
) -> (Vec3, Vec3) {
    if !(delta.is_finite() && delta > 0.0) {
        return (current, velocity);
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * delta;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (velocity + omega * change) * delta;
    let mut new_velocity = (velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Crossed the target this frame: clamp and stop
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        new_velocity = Vec3::ZERO;
    }

    (output, new_velocity)
}

/// Slerp factor for a per-second rate, clamped to [0, 1] (0 for a non-finite step)
pub fn rotation_step(rate: f32, delta: f32) -> f32 {
    let step = rate * delta;
    if step.is_nan() {
        return 0.0;
    }
    step.clamp(0.0, 1.0)
}
