//! Coordinate types.

use serde::{Deserialize, Serialize};

/// Three-component coordinate, as typed by a player (`x y z`).
///
/// # Examples
///
/// ```
/// use emmy_core::Vector3;
///
/// let a = Vector3::at(1.0, 2.0, 2.0);
/// assert_eq!(a.length(), 3.0);
/// assert_eq!(format!("{}", a), "1 2 2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, derive_more::Display)]
#[display("{} {} {}", x, y, z)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Vector with the given components.
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Vector3) -> f64 {
        Vector3::at(self.x - other.x, self.y - other.y, self.z - other.z).length()
    }
}
