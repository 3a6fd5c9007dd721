//! Field configuration (load-time constants for one lawn).

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::core::types::Vec2;
use crate::field::grid::CellCoord;
use crate::math::Rect;

/// Slack subtracted before rounding the cell count up, so a width that is an
/// exact multiple of the cell size does not gain a sliver column from rounding.
const GRID_EPSILON: f32 = 1e-4;

/// Geometry and placement parameters for a weed field.
///
/// The field is a square centred on the origin; `x` and `z` both span
/// `[-field_width / 2, field_width / 2]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Side length of the square field.
    pub field_width: f32,
    /// Side length of one grid cell.
    pub box_width: f32,
    /// Renderable slots reserved per cell. Only one weed is ever placed per cell.
    pub blades_per_box: usize,
    /// Number of weed patches to scatter.
    pub num_patches: usize,
    /// Patch radius.
    pub patch_size: f32,
    /// Patch centres are kept at least this far from the origin (mower spawn).
    pub exclusion_radius: f32,
    /// Cap on rejection-sampling draws when scattering patches.
    pub max_placement_attempts: u32,
    /// Uniform blade scale range `[min, max)`.
    pub blade_scale: [f32; 2],
    /// Seed for every random draw made while building the field.
    pub seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            field_width: 100.0,
            box_width: 0.5,
            blades_per_box: 1,
            num_patches: 40,
            patch_size: 2.0,
            exclusion_radius: 3.0,
            max_placement_attempts: 100_000,
            blade_scale: [0.2, 0.7],
            seed: 12345,
        }
    }
}

impl FieldConfig {
    /// Largest supported number of cells along one axis.
    pub const MAX_GRID_DIM: u32 = 2048;

    /// Largest supported instance buffer, in slots (256 MiB of transforms).
    pub const MAX_SLOTS: usize = 1 << 22;

    /// Check the configuration before any sampling happens.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("field_width", self.field_width),
            ("box_width", self.box_width),
            ("patch_size", self.patch_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!("{name} must be positive and finite, got {value}")));
            }
        }
        if !self.exclusion_radius.is_finite() || self.exclusion_radius < 0.0 {
            return Err(Error::Config(format!(
                "exclusion_radius must be non-negative and finite, got {}",
                self.exclusion_radius
            )));
        }
        if self.exclusion_radius >= self.half_width() {
            return Err(Error::Config(format!(
                "exclusion_radius ({}) must be smaller than half the field width ({})",
                self.exclusion_radius,
                self.half_width()
            )));
        }
        if self.blades_per_box == 0 {
            return Err(Error::Config("blades_per_box must be at least 1".into()));
        }
        let [min, max] = self.blade_scale;
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || max < min {
            return Err(Error::Config(format!(
                "blade_scale must satisfy 0 < min <= max, got [{min}, {max}]"
            )));
        }
        if (self.max_placement_attempts as usize) < self.num_patches {
            return Err(Error::Config(format!(
                "max_placement_attempts ({}) is below num_patches ({})",
                self.max_placement_attempts, self.num_patches
            )));
        }
        let dim = (self.field_width / self.box_width).ceil();
        if dim > Self::MAX_GRID_DIM as f32 {
            return Err(Error::Config(format!(
                "grid of {dim} cells per side exceeds the supported maximum ({})",
                Self::MAX_GRID_DIM
            )));
        }
        let slots = self.cell_count().checked_mul(self.blades_per_box);
        if slots.is_none_or(|slots| slots > Self::MAX_SLOTS) {
            return Err(Error::Config(format!(
                "{} cells x {} blades per box exceeds the supported maximum of {} slots",
                self.cell_count(), self.blades_per_box, Self::MAX_SLOTS
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.field_width * 0.5
    }

    /// Field extent on the XZ plane.
    pub fn bounds(&self) -> Rect {
        Rect::from_center_half_extent(Vec2::ZERO, Vec2::splat(self.half_width()))
    }

    /// Whether a world XZ point lies on the field (edges inclusive).
    pub fn contains(&self, x: f32, z: f32) -> bool {
        self.bounds().contains_point(Vec2::new(x, z))
    }

    /// Cells per axis.
    pub fn grid_dim(&self) -> u32 {
        ((self.field_width / self.box_width) - GRID_EPSILON).ceil().max(1.0) as u32
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        let dim = self.grid_dim() as usize;
        dim * dim
    }

    /// Renderable slots needed to give every cell its batch.
    pub fn slot_capacity(&self) -> usize {
        self.cell_count() * self.blades_per_box
    }

    /// Lower-left corner of a cell.
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            -self.half_width() + cell.ix as f32 * self.box_width,
            -self.half_width() + cell.iz as f32 * self.box_width,
        )
    }

    /// Cell whose extent contains the point, or `None` off the grid.
    pub fn cell_at(&self, x: f32, z: f32) -> Option<CellCoord> {
        let dim = self.grid_dim() as f32;
        let fx = ((x + self.half_width()) / self.box_width).floor();
        let fz = ((z + self.half_width()) / self.box_width).floor();
        if !(fx >= 0.0 && fx < dim && fz >= 0.0 && fz < dim) {
            return None;
        }
        Some(CellCoord::new(fx as u32, fz as u32))
    }
}
