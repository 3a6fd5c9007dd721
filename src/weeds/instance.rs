//! A single placed weed and its instance transforms.

use crate::core::types::{Mat4, Quat, Vec2, Vec3};
use crate::field::CellCoord;

/// A live weed on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weed {
    /// XZ position of the blade base.
    pub position: Vec2,
    /// Cell the weed was placed for.
    pub cell: CellCoord,
    /// Slot in the instance sink.
    pub slot: usize,
    /// Index of the patch that claimed the cell.
    pub patch: usize,
}

impl Weed {
    /// Whether a cut of `radius` around `center` reaches this weed (strict).
    #[inline]
    pub fn is_cut_by(&self, center: Vec2, radius: f32) -> bool {
        self.position.distance(center) < radius
    }
}

/// Baseline transform of a standing blade: uniform scale, yaw about +Y, on the ground.
pub fn blade_transform(position: Vec2, scale: f32, yaw: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::splat(scale),
        Quat::from_rotation_y(yaw),
        Vec3::new(position.x, 0.0, position.y),
    )
}

/// Zero-scale transform left in the slot of a cut weed.
pub fn hidden_transform(position: Vec2) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::ZERO,
        Quat::IDENTITY,
        Vec3::new(position.x, 0.0, position.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weeds::buffer::GpuInstance;

    #[test]
    fn test_blade_transform_places_on_ground() {
        let m = blade_transform(Vec2::new(3.0, -2.0), 0.5, 0.0);
        let p = m.transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(3.0, 0.0, -2.0));
        let tip = m.transform_point3(Vec3::Y);
        assert!((tip.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hidden_transform_is_hidden() {
        assert!(GpuInstance::from_mat4(hidden_transform(Vec2::new(1.0, 1.0))).is_hidden());
        assert!(!GpuInstance::from_mat4(blade_transform(Vec2::ZERO, 0.2, 1.0)).is_hidden());
    }

    #[test]
    fn test_cut_is_strict() {
        let weed = Weed {
            position: Vec2::new(1.0, 0.0),
            cell: CellCoord::new(0, 0),
            slot: 0,
            patch: 0,
        };
        assert!(!weed.is_cut_by(Vec2::ZERO, 1.0));
        assert!(weed.is_cut_by(Vec2::ZERO, 1.0001));
    }
}
