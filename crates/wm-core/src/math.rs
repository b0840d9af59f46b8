//! 3-D vector type and angle helpers.
//!
//! `Vec3` is a single-precision world-space vector for positions, velocities
//! and directions.  Angles are in degrees at the API boundary, matching the
//! units of the skill profiles.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point or direction in world space (metres, metres/second).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn distance_sq(self, other: Vec3) -> f32 {
        (other - self).length_sq()
    }

    /// Unit vector in the same direction, or `ZERO` for a (near) zero vector.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec3::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Angle between two directions in degrees, `180.0` if either is zero.
    pub fn angle_deg(self, other: Vec3) -> f32 {
        let a = self.normalized();
        let b = other.normalized();
        if a == Vec3::ZERO || b == Vec3::ZERO {
            return 180.0;
        }
        a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Some unit vector perpendicular to `self`.
    ///
    /// Used for weave and orbit offsets; the particular choice only has to be
    /// stable for a given input.
    pub fn any_perpendicular(self) -> Vec3 {
        let axis = if self.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let p = self.cross(axis).normalized();
        if p == Vec3::ZERO { Vec3::Z } else { p }
    }

    /// Axis-aligned box check: every component within `half` of `center`.
    #[inline]
    pub fn within_box(self, center: Vec3, half: f32) -> bool {
        (self.x - center.x).abs() <= half
            && (self.y - center.y).abs() <= half
            && (self.z - center.z).abs() <= half
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}
