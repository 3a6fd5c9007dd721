//! Top-level simulation configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::field::FieldConfig;
use crate::weeds::BonusConfig;

/// Everything needed to set up a mowing session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub field: FieldConfig,
    pub bonus: BonusConfig,
    /// Cut radius the mower starts with.
    pub mower_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            bonus: BonusConfig::default(),
            mower_radius: 1.0,
        }
    }
}

impl SimConfig {
    /// Read a JSON config. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.field.validate()?;
        self.bonus.validate()?;
        if !self.mower_radius.is_finite() || self.mower_radius < 0.0 {
            return Err(Error::Config(format!(
                "mower_radius must be non-negative and finite, got {}",
                self.mower_radius
            )));
        }
        Ok(())
    }
}
