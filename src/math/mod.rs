//! Planar geometry helpers

pub mod rect;

pub use rect::Rect;
