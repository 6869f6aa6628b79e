//! Pure gesture math shared by the manipulation controller.

use glam::Vec2;

use crate::settings::ManipulationSettings;

/// New uniform scale after a pinch step. `None` when the previous distance
/// is degenerate and the step has to be skipped.
pub fn pinch_scale(
    old_scale: f32,
    last_distance: f32,
    current_distance: f32,
    limits: &ManipulationSettings,
) -> Option<f32> {
    if !(last_distance > 0.0) {
        return None;
    }
    let factor = current_distance / last_distance;
    Some(limits.clamp_scale(old_scale * factor))
}

/// Signed twist in degrees between the previous and current
/// midpoint-to-reference vectors, counter-clockwise as seen on screen.
/// `None` when the previous vector is too short to give a stable angle.
pub fn twist_degrees(
    last_midpoint: Vec2,
    current_midpoint: Vec2,
    reference: Vec2,
    threshold_px: f32,
) -> Option<f32> {
    let last_vec = reference - last_midpoint;
    let current_vec = reference - current_midpoint;

    if last_vec.length() <= threshold_px || current_vec.length_squared() == 0.0 {
        return None;
    }

    // Screen space is y-down, so flip to get the on-screen winding.
    let radians = -last_vec.perp_dot(current_vec).atan2(last_vec.dot(current_vec));
    Some(radians.to_degrees())
}

/// Wrap an angle in degrees into [0, 360).
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
