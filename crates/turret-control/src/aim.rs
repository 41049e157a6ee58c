//! Aim controller for the two-axis mount.
//!
//! The head yaws about world up. The gun is a child frame of the head and
//! only pitches about its local X axis. Geometry always uses the gun's pivot,
//! never its muzzle.

use glam::{DQuat, DVec3};

use turret_core::constants::{DEFAULT_GUN_OFFSET, DEFAULT_HEAD_OFFSET};

use crate::math::{forward, horizontal, look_rotation, rotate_towards};

/// Yaw mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadMount {
    /// Pivot offset from the turret base, world frame.
    pub offset: DVec3,
    /// World orientation, yaw only.
    pub orientation: DQuat,
}

/// Pitch mount, carried by the head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunMount {
    /// Pivot offset from the head pivot, head frame.
    pub offset: DVec3,
    /// Orientation relative to the head, pitch only.
    pub local_orientation: DQuat,
}

impl HeadMount {
    pub fn new(offset: DVec3) -> Self {
        Self {
            offset,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Start rotated `yaw` radians counter-clockwise from North.
    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.orientation = DQuat::from_rotation_z(yaw);
        self
    }
}

impl Default for HeadMount {
    fn default() -> Self {
        Self::new(DVec3::from_array(DEFAULT_HEAD_OFFSET))
    }
}

impl GunMount {
    pub fn new(offset: DVec3) -> Self {
        Self {
            offset,
            local_orientation: DQuat::IDENTITY,
        }
    }

    /// Start elevated `pitch` radians (positive = up).
    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.local_orientation = DQuat::from_rotation_x(pitch);
        self
    }
}

impl Default for GunMount {
    fn default() -> Self {
        Self::new(DVec3::from_array(DEFAULT_GUN_OFFSET))
    }
}

/// Head plus gun.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MountRig {
    pub head: HeadMount,
    pub gun: GunMount,
}

impl MountRig {
    pub fn head_pivot(&self, base: DVec3) -> DVec3 {
        base + self.head.offset
    }

    pub fn gun_pivot(&self, base: DVec3) -> DVec3 {
        self.head_pivot(base) + self.head.orientation * self.gun.offset
    }

    /// World orientation of the gun.
    pub fn gun_orientation(&self) -> DQuat {
        self.head.orientation * self.gun.local_orientation
    }

    pub fn head_forward(&self) -> DVec3 {
        forward(self.head.orientation)
    }

    pub fn gun_forward(&self) -> DVec3 {
        forward(self.gun_orientation())
    }

    /// Elevation of the gun relative to the head (radians, positive = up).
    pub fn gun_pitch(&self) -> f64 {
        let local = forward(self.gun.local_orientation);
        local.z.atan2(local.y)
    }
}

/// Yaw the head toward `aim` by at most `max_step` radians. Returns the angle turned.
pub fn aim_head(rig: &mut MountRig, base: DVec3, aim: DVec3, max_step: f64) -> f64 {
    let direction = horizontal(aim - rig.head_pivot(base));
    let Some(desired) = look_rotation(direction) else {
        // Aim point straight above or below the pivot: any yaw will do.
        return 0.0;
    };
    let (next, turned) = rotate_towards(rig.head.orientation, desired, max_step);
    rig.head.orientation = next;
    turned
}

/// Pitch the gun toward the height of `aim` by at most `max_step` radians.
///
/// The desired direction keeps the gun's current heading, scaled to the pivot's
/// distance from the aim point, with the vertical component replaced by the
/// aim point's height above the pivot. Heading error is left to the head.
pub fn aim_gun(rig: &mut MountRig, base: DVec3, aim: DVec3, max_step: f64) -> f64 {
    let pivot = rig.gun_pivot(base);
    let distance = pivot.distance(aim);
    let heading = horizontal(rig.gun_forward())
        .try_normalize()
        .or_else(|| horizontal(rig.head_forward()).try_normalize());
    let Some(heading) = heading else {
        return 0.0;
    };

    let direction = heading * distance + DVec3::Z * (aim.z - pivot.z);
    let Some(desired) = look_rotation(direction) else {
        return 0.0;
    };

    let (next, turned) = rotate_towards(rig.gun_orientation(), desired, max_step);
    rig.gun.local_orientation = (rig.head.orientation.conjugate() * next).normalize();
    turned
}

/// Idle look-around: yaw the head by `step` radians about world up.
pub fn idle_sweep(rig: &mut MountRig, step: f64) {
    rig.head.orientation = (DQuat::from_rotation_z(step) * rig.head.orientation).normalize();
}
