//! Mowing session: one mower driving over one weed field.
//!
//! Each step moves the mower, cuts at its position with its current radius,
//! then advances the bonus clock.

pub mod config;

pub use config::SimConfig;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::core::Result;
use crate::core::types::Vec2;
use crate::mower::{Cutter, Mower};
use crate::weeds::{CutReport, WeedField};

pub struct Simulation {
    // Declared before the mower so it drops first and can hand back pending bonuses.
    field: WeedField,
    mower: Rc<RefCell<Mower>>,
}

impl Simulation {
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let mower = Mower::shared(config.mower_radius);
        let field = WeedField::generate(config.field.clone(), config.bonus.clone(), &mower)?;
        Ok(Self { field, mower })
    }

    /// Move the mower to `position`, cut there, then advance time by `dt_seconds`.
    pub fn step(&mut self, position: Vec2, dt_seconds: f32) -> CutReport {
        let radius = {
            let mut mower = self.mower.borrow_mut();
            mower.set_position(position);
            mower.cut_radius()
        };
        let report = self.field.cut(position, radius);
        self.field.advance(dt_seconds);
        report
    }

    pub fn mower(&self) -> Ref<'_, Mower> {
        self.mower.borrow()
    }

    pub fn field(&self) -> &WeedField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut WeedField {
        &mut self.field
    }
}
