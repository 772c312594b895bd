//! Positions and the observer reference frame.

use serde::{Deserialize, Serialize};

/// A point in world space, in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// East-west axis.
    pub x: f64,
    /// Vertical axis.
    pub y: f64,
    /// North-south axis.
    pub z: f64,
}

impl Vec3 {
    /// Construct a point from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Per-axis absolute distance to `other`.
    pub fn abs_delta(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: (self.x - other.x).abs(),
            y: (self.y - other.y).abs(),
            z: (self.z - other.z).abs(),
        }
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

/// The sampling reference point for one tick.
///
/// Captured from the controlling agent once per tick and treated as
/// immutable for the rest of that tick. All proximity predicates are
/// evaluated relative to [`position`](Self::position).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObserverFrame {
    /// Position of the controlling agent.
    pub position: Vec3,
}

impl ObserverFrame {
    /// Frame centred on `position`.
    pub const fn at(position: Vec3) -> Self {
        Self { position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn abs_delta_is_symmetric() {
        let a = Vec3::new(1.0, -2.0, 3.5);
        let b = Vec3::new(-1.0, 2.0, 0.5);
        assert_eq!(a.abs_delta(&b), Vec3::new(2.0, 4.0, 3.0));
        assert_eq!(b.abs_delta(&a), a.abs_delta(&b));
    }

    #[test]
    fn from_tuple() {
        let v: Vec3 = (1.0, 2.0, 3.0).into();
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    proptest! {
        #[test]
        fn abs_delta_non_negative_and_symmetric(
            ax in -1e6f64..1e6, ay in -1e6f64..1e6, az in -1e6f64..1e6,
            bx in -1e6f64..1e6, by in -1e6f64..1e6, bz in -1e6f64..1e6,
        ) {
            let a = Vec3::new(ax, ay, az);
            let b = Vec3::new(bx, by, bz);
            let d = a.abs_delta(&b);
            prop_assert!(d.x >= 0.0 && d.y >= 0.0 && d.z >= 0.0);
            prop_assert_eq!(d, b.abs_delta(&a));
        }
    }
}
