//! Field partitioning: the cell grid and the scattered weed patches.

pub mod config;
pub mod grid;
pub mod patch;

pub use config::FieldConfig;
pub use grid::CellCoord;
pub use patch::{Patch, PatchSet};
