//! Vector and orientation helpers.
//!
//! Mount frames use right = +X, forward = +Y, up = +Z, so the identity
//! orientation faces North with world up overhead.

use glam::{DMat3, DQuat, DVec3};

use turret_core::constants::{ANGLE_EPSILON, DIRECTION_EPSILON};

/// Local forward axis of every mount.
pub const FORWARD: DVec3 = DVec3::Y;

/// World up.
pub const UP: DVec3 = DVec3::Z;

/// Project onto the horizontal plane.
pub fn horizontal(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.y, 0.0)
}

/// Forward axis of an orientation, in world space.
pub fn forward(orientation: DQuat) -> DVec3 {
    orientation * FORWARD
}

/// Orientation facing `direction` with its up axis as close to world up as possible.
///
/// Returns `None` for a zero direction or one parallel to world up, where no
/// unique facing exists.
pub fn look_rotation(direction: DVec3) -> Option<DQuat> {
    let forward = direction.try_normalize()?;
    let right = forward.cross(UP);
    if right.length_squared() <= DIRECTION_EPSILON {
        return None;
    }
    let right = right.normalize();
    let up = right.cross(forward);
    Some(DQuat::from_mat3(&DMat3::from_cols(right, forward, up)).normalize())
}

/// Angle of the shortest rotation taking `from` onto `to`, in radians.
pub fn angle_between(from: DQuat, to: DQuat) -> f64 {
    let delta = to * from.conjugate();
    2.0 * delta.xyz().length().atan2(delta.w.abs())
}

/// Rotate `current` toward `desired` by at most `max_step` radians.
///
/// Equivalent to a shortest-arc slerp with fraction `min(1, max_step / angle)`,
/// so the angular speed is constant until the final step, which lands exactly
/// on `desired`. Returns the new orientation and the angle actually turned.
pub fn rotate_towards(current: DQuat, desired: DQuat, max_step: f64) -> (DQuat, f64) {
    let mut delta = desired * current.conjugate();
    if delta.w < 0.0 {
        delta = -delta;
    }
    let sin_half = delta.xyz().length();
    let angle = 2.0 * sin_half.atan2(delta.w);

    // Already aligned: no division by a zero angle.
    if angle <= ANGLE_EPSILON || max_step <= 0.0 {
        return (current, 0.0);
    }
    if max_step >= angle {
        return (desired, angle);
    }

    let axis = delta.xyz() / sin_half;
    let step = DQuat::from_axis_angle(axis, max_step);
    ((step * current).normalize(), max_step)
}
