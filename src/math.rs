//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Quat` inputs, making them straightforward to unit-test.

use bevy::prelude::{EulerRot, Quat};

/// Advances a fade level by `delta` and clamps the result into `[0, 1]`.
///
/// A positive `delta` darkens the screen (fade-out leg), a negative one
/// reveals it again (fade-in leg).
///
/// # Examples
/// ```
/// # use vr_teleport::math::step_fade;
/// assert_eq!(step_fade(0.9, 0.5), 1.0);
/// assert_eq!(step_fade(0.1, -0.5), 0.0);
/// ```
pub fn step_fade(level: f32, delta: f32) -> f32 {
    (level + delta).clamp(0.0, 1.0)
}

/// Keeps only the yaw component of a head rotation.
///
/// Uses the `YXZ` decomposition (yaw, then pitch, then roll) so pitch and roll
/// of the tracked head are discarded entirely.
pub fn yaw_only(rotation: Quat) -> Quat {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    Quat::from_rotation_y(yaw)
}

/// Final player orientation after a teleport with head-yaw compensation.
///
/// Cancels `amount` (0..=1) of the physical head yaw so the view faces the
/// destination's forward direction no matter how the user's body is turned:
/// `slerp(identity, inverse(yaw(head)), amount) * destination`.
pub fn compensate_head_yaw(head: Quat, destination: Quat, amount: f32) -> Quat {
    let cancel = Quat::IDENTITY.slerp(yaw_only(head).inverse(), amount);
    (cancel * destination).normalize()
}

/// Yaw angle (radians) of a rotation in the `YXZ` decomposition.
pub fn yaw_of(rotation: Quat) -> f32 {
    rotation.to_euler(EulerRot::YXZ).0
}

/// Clamps a pitch change so the head camera cannot flip past vertical.
///
/// `current` is the existing pitch in radians (from `Quat::to_euler`),
/// `delta` the desired change. Returns the effective delta to apply.
pub fn clamp_pitch(current: f32, delta: f32, margin: f32) -> f32 {
    let limit = std::f32::consts::FRAC_PI_2 - margin;
    let clamped = (current + delta).clamp(-limit, limit);
    clamped - current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle_diff(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(std::f32::consts::TAU);
        d.min(std::f32::consts::TAU - d)
    }

    // ── step_fade ───────────────────────────────────────────────────

    #[test]
    fn step_fade_clamps_at_one() {
        assert_eq!(step_fade(0.95, 0.2), 1.0);
    }

    #[test]
    fn step_fade_clamps_at_zero() {
        assert_eq!(step_fade(0.05, -0.2), 0.0);
    }

    #[test]
    fn step_fade_passes_through_inside_range() {
        assert!((step_fade(0.2, 0.3) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn five_steps_of_point_two_reach_exactly_one() {
        let mut level = 0.0;
        for _ in 0..5 {
            level = step_fade(level, 2.0 * 0.1);
        }
        assert_eq!(level, 1.0);
    }

    // ── yaw_only ────────────────────────────────────────────────────

    #[test]
    fn yaw_only_drops_pitch_and_roll() {
        let head = Quat::from_euler(EulerRot::YXZ, 0.7, 0.4, -0.3);
        let flat = yaw_only(head);
        let (yaw, pitch, roll) = flat.to_euler(EulerRot::YXZ);
        assert!((yaw - 0.7).abs() < 1e-5);
        assert!(pitch.abs() < 1e-5);
        assert!(roll.abs() < 1e-5);
    }

    // ── compensate_head_yaw ─────────────────────────────────────────

    #[test]
    fn full_compensation_subtracts_head_yaw() {
        let theta = 0.9;
        let dest_yaw = 0.3;
        let head = Quat::from_rotation_y(theta);
        let dest = Quat::from_rotation_y(dest_yaw);
        let result = compensate_head_yaw(head, dest, 1.0);
        assert!(angle_diff(yaw_of(result), dest_yaw - theta) < 1e-4);
    }

    #[test]
    fn zero_compensation_keeps_destination() {
        let head = Quat::from_rotation_y(1.2);
        let dest = Quat::from_rotation_y(-0.5);
        let result = compensate_head_yaw(head, dest, 0.0);
        assert!(result.angle_between(dest) < 1e-4);
    }

    #[test]
    fn half_compensation_cancels_half_the_yaw() {
        let head = Quat::from_rotation_y(1.0);
        let result = compensate_head_yaw(head, Quat::IDENTITY, 0.5);
        assert!(angle_diff(yaw_of(result), -0.5) < 1e-4);
    }

    #[test]
    fn head_pitch_and_roll_never_leak_into_result() {
        let theta = -0.6;
        let dest = Quat::from_rotation_y(0.25);
        let level = compensate_head_yaw(Quat::from_rotation_y(theta), dest, 1.0);
        let tilted = compensate_head_yaw(
            Quat::from_euler(EulerRot::YXZ, theta, 0.5, 0.35),
            dest,
            1.0,
        );
        assert!(level.angle_between(tilted) < 1e-4);
        let (_, pitch, roll) = tilted.to_euler(EulerRot::YXZ);
        assert!(pitch.abs() < 1e-4);
        assert!(roll.abs() < 1e-4);
    }

    // ── clamp_pitch ─────────────────────────────────────────────────

    #[test]
    fn small_pitch_delta_passes_through() {
        let delta = clamp_pitch(0.0, 0.1, 0.05);
        assert!((delta - 0.1).abs() < 1e-6);
    }

    #[test]
    fn pitch_clamps_at_upper_limit() {
        let limit = std::f32::consts::FRAC_PI_2 - 0.05;
        let delta = clamp_pitch(limit - 0.01, 0.1, 0.05);
        assert!((delta - 0.01).abs() < 1e-4, "should clamp to remaining room");
    }
}
