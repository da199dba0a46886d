//! Minimal local-transform types for pooled instances.
//!
//! Pooled instances only need a neutral local pose when they sit idle in a
//! pool: zero position and identity rotation. Full scene-graph math lives in
//! the host engine, not here.

/// Three-component vector used for local positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Quaternion used for local rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Local transform carried by every pooled instance.
///
/// Pools reset this to the neutral pose whenever an instance is preloaded or
/// recycled, so callers always receive instances in a known state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub local_position: Vec3,
    pub local_rotation: Quat,
}

impl Transform {
    /// Reset the local pose to zero position and identity rotation.
    pub fn reset_local(&mut self) {
        self.local_position = Vec3::ZERO;
        self.local_rotation = Quat::IDENTITY;
    }

    /// Whether the transform currently sits at the neutral pose.
    pub fn is_neutral(&self) -> bool {
        self.local_position == Vec3::ZERO && self.local_rotation == Quat::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform_is_neutral() {
        let transform = Transform::default();
        assert!(transform.is_neutral());
    }

    #[test]
    fn test_reset_local_restores_neutral_pose() {
        let mut transform = Transform {
            local_position: Vec3::new(3.0, -1.0, 0.5),
            local_rotation: Quat::new(0.0, 0.707, 0.0, 0.707),
        };
        assert!(!transform.is_neutral());

        transform.reset_local();
        assert!(transform.is_neutral());
        assert_eq!(transform.local_position, Vec3::ZERO);
        assert_eq!(transform.local_rotation, Quat::IDENTITY);
    }
}
