//! Weed patch scattering.
//!
//! Patches are circular regions of the field. Their centres are drawn by
//! rejection sampling: uniform over the field square, redrawn while inside the
//! exclusion disk around the origin where the mower spawns.

use rand::Rng;

use crate::core::{Error, Result};
use crate::core::types::Vec2;
use crate::field::FieldConfig;

/// A circular weed patch. The radius is shared by every patch of a set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patch {
    pub center: Vec2,
}

impl Patch {
    pub fn new(center: Vec2) -> Self {
        Self { center }
    }

    /// Circular inclusion test, boundary inclusive.
    #[inline]
    pub fn contains(&self, point: Vec2, radius: f32) -> bool {
        self.center.distance(point) <= radius
    }
}

/// The fixed set of patches weeds are placed into.
#[derive(Clone, Debug)]
pub struct PatchSet {
    patches: Vec<Patch>,
    radius: f32,
}

impl PatchSet {
    /// Scatter `config.num_patches` patches over the field.
    ///
    /// Fails with [`Error::PlacementExhausted`] once `max_placement_attempts`
    /// draws have been spent without placing every patch.
    pub fn scatter<R: Rng>(config: &FieldConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let mut patches = Vec::with_capacity(config.num_patches);
        let mut attempts = 0u32;
        while patches.len() < config.num_patches {
            if attempts >= config.max_placement_attempts {
                return Err(Error::PlacementExhausted {
                    placed: patches.len(),
                    requested: config.num_patches,
                    attempts,
                });
            }
            attempts += 1;

            let center = Vec2::new(
                (rng.random::<f32>() - 0.5) * config.field_width,
                (rng.random::<f32>() - 0.5) * config.field_width,
            );
            if center.length() < config.exclusion_radius {
                continue;
            }
            patches.push(Patch::new(center));
        }

        log::debug!(
            "Scattered {} patches in {} draws (exclusion radius {})",
            patches.len(), attempts, config.exclusion_radius
        );

        Ok(Self { patches, radius: config.patch_size })
    }

    /// Build from explicit centres, checked against the same invariants as
    /// [`PatchSet::scatter`].
    pub fn from_centers(config: &FieldConfig, centers: impl IntoIterator<Item = Vec2>) -> Result<Self> {
        config.validate()?;
        let set = Self {
            patches: centers.into_iter().map(Patch::new).collect(),
            radius: config.patch_size,
        };
        set.check_against(config)?;
        Ok(set)
    }

    /// Verify that this set could have come from `config`: same radius, every
    /// centre on the field and outside the exclusion disk.
    pub fn check_against(&self, config: &FieldConfig) -> Result<()> {
        if self.radius != config.patch_size {
            return Err(Error::Config(format!(
                "patch radius {} does not match patch_size {}",
                self.radius, config.patch_size
            )));
        }
        let bounds = config.bounds();
        for patch in &self.patches {
            let center = patch.center;
            if !center.is_finite() || !bounds.contains_point(center) {
                return Err(Error::Config(format!("patch centre {center} lies outside the field")));
            }
            if center.length() < config.exclusion_radius {
                return Err(Error::Config(format!(
                    "patch centre {center} lies inside the exclusion radius {}",
                    config.exclusion_radius
                )));
            }
        }
        Ok(())
    }

    /// Index of the first patch containing `point`.
    pub fn first_containing(&self, point: Vec2) -> Option<usize> {
        self.patches.iter().position(|p| p.contains(point, self.radius))
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn get(&self, index: usize) -> Option<&Patch> {
        self.patches.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Patch> {
        self.patches.iter()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_scatter_respects_exclusion_and_bounds() {
        let config = FieldConfig { num_patches: 500, ..Default::default() };
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let set = PatchSet::scatter(&config, &mut rng).unwrap();

        assert_eq!(set.len(), 500);
        for patch in set.iter() {
            assert!(patch.center.length() >= config.exclusion_radius);
            assert!(config.contains(patch.center.x, patch.center.y));
        }
    }

    #[test]
    fn test_scatter_is_seed_stable() {
        let config = FieldConfig::default();
        let a = PatchSet::scatter(&config, &mut ChaCha12Rng::seed_from_u64(9)).unwrap();
        let b = PatchSet::scatter(&config, &mut ChaCha12Rng::seed_from_u64(9)).unwrap();
        let c = PatchSet::scatter(&config, &mut ChaCha12Rng::seed_from_u64(10)).unwrap();
        assert_eq!(a.patches, b.patches);
        assert_ne!(a.patches, c.patches);
    }

    #[test]
    fn test_crowded_field_still_places() {
        // Exclusion disk covers most of the square; rejection still terminates.
        let config = FieldConfig {
            field_width: 10.0,
            exclusion_radius: 4.9,
            num_patches: 20,
            ..Default::default()
        };
        let set = PatchSet::scatter(&config, &mut ChaCha12Rng::seed_from_u64(3)).unwrap();
        assert!(set.iter().all(|p| p.center.length() >= 4.9));
    }

    #[test]
    fn test_attempt_cap_reports_exhaustion() {
        let config = FieldConfig {
            field_width: 10.0,
            exclusion_radius: 4.99,
            num_patches: 50,
            max_placement_attempts: 50,
            ..Default::default()
        };
        let err = PatchSet::scatter(&config, &mut ChaCha12Rng::seed_from_u64(3)).unwrap_err();
        match err {
            Error::PlacementExhausted { placed, requested, attempts } => {
                assert!(placed < requested);
                assert_eq!(requested, 50);
                assert_eq!(attempts, 50);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_patches() {
        let config = FieldConfig { num_patches: 0, ..Default::default() };
        let set = PatchSet::scatter(&config, &mut ChaCha12Rng::seed_from_u64(0)).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.first_containing(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_from_centers_validates() {
        let config = FieldConfig { field_width: 20.0, box_width: 2.0, ..Default::default() };
        assert!(PatchSet::from_centers(&config, [Vec2::new(5.0, 5.0)]).is_ok());
        assert!(PatchSet::from_centers(&config, [Vec2::new(1.0, 1.0)]).is_err());
        assert!(PatchSet::from_centers(&config, [Vec2::new(15.0, 0.0)]).is_err());
    }

    #[test]
    fn test_check_against_other_config() {
        let small = FieldConfig { field_width: 20.0, box_width: 2.0, ..Default::default() };
        let set = PatchSet::from_centers(&small, [Vec2::new(5.0, 5.0)]).unwrap();
        assert!(set.check_against(&small).is_ok());

        let wider_patches = FieldConfig { patch_size: 4.0, ..small.clone() };
        assert!(set.check_against(&wider_patches).is_err());
        let bigger_exclusion = FieldConfig { exclusion_radius: 8.0, ..small.clone() };
        assert!(set.check_against(&bigger_exclusion).is_err());
        let narrower = FieldConfig { field_width: 8.0, exclusion_radius: 1.0, ..small };
        assert!(set.check_against(&narrower).is_err());
    }

    #[test]
    fn test_first_containing_is_inclusive() {
        let config = FieldConfig { field_width: 20.0, box_width: 2.0, ..Default::default() };
        let set = PatchSet::from_centers(&config, [Vec2::new(5.0, 5.0), Vec2::new(6.0, 5.0)]).unwrap();
        assert_eq!(set.first_containing(Vec2::new(7.0, 5.0)), Some(0));
        assert_eq!(set.first_containing(Vec2::new(7.5, 5.0)), Some(1));
        assert_eq!(set.first_containing(Vec2::new(-5.0, 5.0)), None);
    }
}
