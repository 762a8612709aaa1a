//! 3D motion vectors for the physics features.
//!
//! Components are authoritative; headings and pitches are derived on
//! demand rather than stored, so there is no stale-angle state to keep in
//! sync. Angles are in degrees: heading 0–360 clockwise from north
//! (north is −y on the room grid), pitch −90..=90 above the ground plane.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A 3D motion vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// Eastward component.
    pub x: f64,
    /// Southward component.
    pub y: f64,
    /// Upward component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a vector from components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns this vector scaled by a factor.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Returns the magnitude.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns the magnitude of the ground-plane (x, y) projection.
    #[must_use]
    pub fn ground_magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the heading in degrees, 0–360 clockwise from north.
    ///
    /// A zero ground-plane projection has no meaningful heading and
    /// reports 0.
    #[must_use]
    pub fn heading_degrees(self) -> f64 {
        if self.ground_magnitude() == 0.0 {
            return 0.0;
        }
        let raw = self.x.atan2(-self.y).to_degrees();
        if raw < 0.0 { raw + 360.0 } else { raw }
    }

    /// Returns the pitch above the ground plane in degrees, −90..=90.
    #[must_use]
    pub fn pitch_degrees(self) -> f64 {
        if self.z == 0.0 && self.ground_magnitude() == 0.0 {
            return 0.0;
        }
        self.z.atan2(self.ground_magnitude()).to_degrees()
    }

    /// Returns this vector with its magnitude limited to `limit`.
    ///
    /// Direction is preserved; vectors already within the limit are
    /// returned unchanged. A non-positive limit collapses to zero.
    #[must_use]
    pub fn clamped(self, limit: f64) -> Self {
        if limit <= 0.0 {
            return Self::ZERO;
        }
        let mag = self.magnitude();
        if mag <= limit {
            self
        } else {
            self.scale(limit / mag)
        }
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}
