//! Weed registry and trimmer.
//!
//! [`WeedField`] places one weed per grid cell whose jittered sample falls in a
//! patch, writes every weed's transform into an [`InstanceSink`], and removes
//! weeds when the mower cuts near them. Cutting close to a fresh patch centre
//! grows the mower for a while.

pub mod bonus;
pub mod buffer;
pub mod index;
pub mod instance;

pub use bonus::{BonusConfig, BonusGrant, BonusId, BonusScheduler};
pub use buffer::{GpuInstance, InstanceBuffer, InstanceSink};
pub use index::WeedIndex;
pub use instance::Weed;

use std::cell::RefCell;
use std::f32::consts::PI;
use std::rc::{Rc, Weak};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::core::{Error, Result};
use crate::core::types::Vec2;
use crate::field::{CellCoord, FieldConfig, PatchSet};
use crate::mower::Cutter;
use instance::{blade_transform, hidden_transform};

/// Outcome of a single [`WeedField::cut`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CutReport {
    /// Weeds removed by this cut.
    pub removed: usize,
    /// Bonuses granted by this cut.
    pub bonuses: Vec<BonusId>,
}

/// Running counters for a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub created: usize,
    pub live: usize,
    pub removed: usize,
    pub bonuses_granted: usize,
    pub bonuses_expired: usize,
    /// Grants dropped without being undone: the mower no longer existed, or
    /// was borrowed when every pending grant was revoked at once.
    pub bonuses_orphaned: usize,
}

/// What happened when a grant was taken back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Revert {
    Applied,
    /// The mower no longer exists.
    Orphaned,
    /// The mower is borrowed elsewhere; nothing was changed.
    Busy,
}

/// The weeds of one field plus the state needed to trim them.
pub struct WeedField<S: InstanceSink = InstanceBuffer> {
    config: FieldConfig,
    bonus: BonusConfig,
    patches: PatchSet,
    /// Parallel to `patches`; cleared once a patch has been consumed.
    eligible: Vec<bool>,
    index: WeedIndex,
    sink: S,
    mower: Weak<RefCell<dyn Cutter>>,
    scheduler: BonusScheduler,
    stats: FieldStats,
}

impl WeedField<InstanceBuffer> {
    /// Build a field with its own instance buffer, one slot batch per cell.
    pub fn generate<M: Cutter + 'static>(
        config: FieldConfig,
        bonus: BonusConfig,
        mower: &Rc<RefCell<M>>,
    ) -> Result<Self> {
        config.validate()?;
        let sink = InstanceBuffer::new(config.slot_capacity());
        Self::new(config, bonus, sink, mower)
    }
}

impl<S: InstanceSink> WeedField<S> {
    /// Scatter patches from `config.seed` and place weeds into `sink`.
    pub fn new<M: Cutter + 'static>(
        config: FieldConfig,
        bonus: BonusConfig,
        sink: S,
        mower: &Rc<RefCell<M>>,
    ) -> Result<Self> {
        config.validate()?;
        bonus.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let patches = PatchSet::scatter(&config, &mut rng)?;
        Self::build(config, bonus, patches, sink, mower, &mut rng)
    }

    /// Place weeds for an explicit patch set. Jitter and blade variation still
    /// come from `config.seed`. The set must agree with `config` on patch radius,
    /// field bounds and exclusion radius.
    pub fn with_patches<M: Cutter + 'static>(
        config: FieldConfig,
        bonus: BonusConfig,
        patches: PatchSet,
        sink: S,
        mower: &Rc<RefCell<M>>,
    ) -> Result<Self> {
        config.validate()?;
        bonus.validate()?;
        patches.check_against(&config)?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        Self::build(config, bonus, patches, sink, mower, &mut rng)
    }

    fn build<M: Cutter + 'static>(
        config: FieldConfig,
        bonus: BonusConfig,
        patches: PatchSet,
        mut sink: S,
        mower: &Rc<RefCell<M>>,
        rng: &mut ChaCha12Rng,
    ) -> Result<Self> {
        let dim = config.grid_dim();
        let box_width = config.box_width;

        // Jitter is drawn serially in placement order so the parallel membership
        // pass below cannot change which weeds a seed produces.
        let samples: Vec<(CellCoord, Vec2)> = CellCoord::iter(dim)
            .map(|cell| {
                let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
                (cell, config.cell_origin(cell) + jitter * box_width)
            })
            .collect();

        let claims: Vec<Option<usize>> = samples
            .par_iter()
            .map(|(_, position)| patches.first_containing(*position))
            .collect();

        let required = claims.iter().flatten().count();
        if sink.capacity() < required {
            return Err(Error::CapacityExceeded {
                capacity: sink.capacity(),
                required,
            });
        }

        let [scale_min, scale_max] = config.blade_scale;
        let mut index = WeedIndex::new(&config);
        let mut slot = 0;
        for ((cell, position), claim) in samples.into_iter().zip(claims) {
            let Some(patch) = claim else { continue };
            let scale = if scale_max > scale_min {
                rng.random_range(scale_min..scale_max)
            } else {
                scale_min
            };
            let yaw = rng.random_range(0.0..PI);
            sink.set_transform(slot, blade_transform(position, scale, yaw));
            index.insert(Weed { position, cell, slot, patch });
            slot += 1;
        }

        log::info!(
            "Placed {} weeds from {} patches over {} cells ({}m field, {}m cells)",
            slot, patches.len(), config.cell_count(), config.field_width, box_width
        );

        // Unsize after downgrading; `Rc::downgrade` will not coerce its argument.
        let handle = Rc::downgrade(mower);
        let handle: Weak<RefCell<dyn Cutter>> = handle;
        Ok(Self {
            eligible: vec![true; patches.len()],
            config,
            bonus,
            patches,
            index,
            sink,
            mower: handle,
            scheduler: BonusScheduler::new(),
            stats: FieldStats {
                created: slot,
                live: slot,
                ..Default::default()
            },
        })
    }

    /// Remove every weed strictly within `radius` of `position`, then check
    /// for patch bonuses at `position`.
    ///
    /// A non-finite position or radius makes the call a no-op. A non-positive
    /// radius removes nothing but still checks bonuses.
    pub fn cut(&mut self, position: Vec2, radius: f32) -> CutReport {
        if !position.is_finite() || !radius.is_finite() {
            return CutReport::default();
        }

        let sink = &mut self.sink;
        let removed = self.index.remove_within(position, radius, |weed| {
            sink.set_transform(weed.slot, hidden_transform(weed.position));
        });
        self.stats.removed += removed;
        self.stats.live = self.index.len();

        let bonuses = self.apply_bonuses(position);

        if removed > 0 || !bonuses.is_empty() {
            log::debug!(
                "Cut at {} r={:.2}: removed {}, {} bonus(es), {} live",
                position, radius, removed, bonuses.len(), self.stats.live
            );
        }

        CutReport { removed, bonuses }
    }

    fn apply_bonuses(&mut self, position: Vec2) -> Vec<BonusId> {
        // Tested against eligibility as it stood before this cut, so overlapping
        // patches under the same cut each grant their own bonus.
        let triggered = self
            .patches
            .iter()
            .zip(&self.eligible)
            .filter(|(patch, eligible)| **eligible && patch.center.distance(position) <= self.bonus.trigger_radius)
            .count();
        if triggered == 0 {
            return Vec::new();
        }

        let Some(mower) = self.mower.upgrade() else {
            log::debug!("Bonus at {} ignored: mower is gone", position);
            return Vec::new();
        };
        let Ok(mut mower) = mower.try_borrow_mut() else {
            log::warn!("Bonus at {} ignored: mower is borrowed elsewhere", position);
            return Vec::new();
        };

        let mut granted = Vec::with_capacity(triggered);
        for _ in 0..triggered {
            mower.adjust(self.bonus.radius_delta, self.bonus.scale_delta);
            let grant = self.scheduler.schedule(
                self.bonus.radius_delta,
                self.bonus.scale_delta,
                self.bonus.duration,
            );
            granted.push(grant.id);
        }

        for (patch, eligible) in self.patches.iter().zip(self.eligible.iter_mut()) {
            if patch.center.distance(position) <= self.bonus.consume_radius {
                *eligible = false;
            }
        }

        self.stats.bonuses_granted += granted.len();
        log::info!(
            "Mower bonus x{} at {}: cut radius now {:.2} until t={:.1}",
            granted.len(),
            position,
            mower.cut_radius(),
            self.scheduler.now() + self.bonus.duration as f64
        );
        granted
    }

    /// Advance the simulation clock and undo every bonus that has run out.
    ///
    /// Returns the number of grants that left the queue. A grant that finds the
    /// mower borrowed stays queued and is retried on the next call.
    pub fn advance(&mut self, dt_seconds: f32) -> usize {
        let due = self.scheduler.advance(dt_seconds);
        let mut count = 0;
        for grant in due {
            match self.revert(grant) {
                Revert::Busy => {
                    log::warn!("Mower busy while expiring bonus {:?}; retrying next tick", grant.id);
                    self.scheduler.requeue(grant);
                }
                Revert::Applied | Revert::Orphaned => count += 1,
            }
        }
        count
    }

    /// Undo one pending bonus now instead of waiting for it to expire.
    ///
    /// Returns false if `id` is not pending or the mower is borrowed; in the
    /// latter case the grant stays pending.
    pub fn revoke_bonus(&mut self, id: BonusId) -> bool {
        let Some(grant) = self.scheduler.cancel(id) else {
            return false;
        };
        match self.revert(grant) {
            Revert::Busy => {
                self.scheduler.requeue(grant);
                false
            }
            Revert::Applied | Revert::Orphaned => true,
        }
    }

    /// Undo every pending bonus now and empty the queue.
    ///
    /// Returns the number of grants whose deltas were taken back off the mower.
    /// Grants that cannot be undone because the mower is gone or borrowed are
    /// counted as orphaned.
    pub fn revoke_bonuses(&mut self) -> usize {
        let pending = self.scheduler.drain_all();
        let mut reverted = 0;
        for grant in pending {
            match self.revert(grant) {
                Revert::Applied => reverted += 1,
                Revert::Orphaned => {}
                Revert::Busy => {
                    log::warn!(
                        "Mower busy while revoking bonus {:?}; radius stays {:+} too large",
                        grant.id, grant.radius_delta
                    );
                    self.stats.bonuses_orphaned += 1;
                }
            }
        }
        reverted
    }

    fn revert(&mut self, grant: BonusGrant) -> Revert {
        let Some(mower) = self.mower.upgrade() else {
            log::debug!("Bonus {:?} expired after the mower was dropped", grant.id);
            self.stats.bonuses_orphaned += 1;
            return Revert::Orphaned;
        };
        let Ok(mut mower) = mower.try_borrow_mut() else {
            return Revert::Busy;
        };
        mower.adjust(-grant.radius_delta, -grant.scale_delta);
        self.stats.bonuses_expired += 1;
        Revert::Applied
    }

    /// Live weeds, in no particular order.
    pub fn weeds(&self) -> impl Iterator<Item = &Weed> {
        self.index.iter()
    }

    pub fn live_count(&self) -> usize {
        self.index.len()
    }

    pub fn patches(&self) -> &PatchSet {
        &self.patches
    }

    /// Whether the patch at `index` can still grant a bonus.
    pub fn is_patch_eligible(&self, index: usize) -> bool {
        self.eligible.get(index).copied().unwrap_or(false)
    }

    pub fn eligible_patch_count(&self) -> usize {
        self.eligible.iter().filter(|e| **e).count()
    }

    pub fn pending_bonus_count(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Simulation time seen by the bonus clock.
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn bonus_config(&self) -> &BonusConfig {
        &self.bonus
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }
}

impl<S: InstanceSink> Drop for WeedField<S> {
    fn drop(&mut self) {
        // Pending expiries die with the field; hand the mower back its base size.
        let revoked = self.revoke_bonuses();
        if revoked > 0 {
            log::debug!("Revoked {} pending bonus(es) on drop", revoked);
        }
    }
}
