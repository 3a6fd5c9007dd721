//! The mower: the actor whose movement drives trimming.
//!
//! The weed field never owns the mower. It holds a weak handle to anything
//! implementing [`Cutter`] and only ever nudges its cut radius and visual scale
//! by additive deltas.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::types::Vec2;

/// Mutable actor state the trimmer is allowed to touch.
pub trait Cutter {
    /// Current cut radius.
    fn cut_radius(&self) -> f32;

    /// Current uniform visual scale.
    fn scale(&self) -> f32;

    /// Apply additive deltas to the cut radius and visual scale.
    fn adjust(&mut self, radius_delta: f32, scale_delta: f32);
}

/// A mower with a position on the field, a cut radius and a visual scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Mower {
    position: Vec2,
    cut_radius: f32,
    scale: f32,
}

impl Mower {
    /// Create a mower at the origin with unit scale.
    pub fn new(cut_radius: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            cut_radius,
            scale: 1.0,
        }
    }

    /// Create a mower behind a shared handle, ready to hand to a field.
    pub fn shared(cut_radius: f32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(cut_radius)))
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}

impl Cutter for Mower {
    fn cut_radius(&self) -> f32 {
        self.cut_radius
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn adjust(&mut self, radius_delta: f32, scale_delta: f32) {
        self.cut_radius += radius_delta;
        self.scale += scale_delta;
    }
}
