//! Radius bonus granted when the mower cuts close to a patch centre.
//!
//! Every grant is a separate entry with its own expiry, so overlapping bonuses
//! each undo exactly what they added. Expiries run on the simulation clock.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::core::time::SimClock;

/// Tunable bonus parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    /// A cut within this distance of an eligible patch centre grants a bonus.
    pub trigger_radius: f32,
    /// Patches within this distance of a triggering cut stop being eligible.
    /// Kept slightly above `trigger_radius` as a hysteresis band.
    pub consume_radius: f32,
    /// Added to the mower's cut radius per grant.
    pub radius_delta: f32,
    /// Added to the mower's visual scale per grant.
    pub scale_delta: f32,
    /// Simulation seconds until a grant is undone.
    pub duration: f32,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            trigger_radius: 2.0,
            consume_radius: 2.1,
            radius_delta: 0.2,
            scale_delta: 0.2,
            duration: 10.0,
        }
    }
}

impl BonusConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("trigger_radius", self.trigger_radius),
            ("consume_radius", self.consume_radius),
            ("radius_delta", self.radius_delta),
            ("scale_delta", self.scale_delta),
            ("duration", self.duration),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!("{name} must be non-negative and finite, got {value}")));
            }
        }
        if self.consume_radius < self.trigger_radius {
            return Err(Error::Config(format!(
                "consume_radius ({}) must not be smaller than trigger_radius ({})",
                self.consume_radius, self.trigger_radius
            )));
        }
        Ok(())
    }
}

/// Identifies one grant for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BonusId(u64);

/// A grant that has been applied and is waiting to be undone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BonusGrant {
    pub id: BonusId,
    pub radius_delta: f32,
    pub scale_delta: f32,
    /// Simulation time at which the grant is undone.
    pub expires_at: f64,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    due: f64,
    id: BonusId,
}

impl Eq for Pending {}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap and the earliest expiry must pop first
        other.due.total_cmp(&self.due).then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pending grant expiries on a simulation clock.
///
/// Cancelled grants leave a stale heap entry behind; it is skipped when popped.
#[derive(Default)]
pub struct BonusScheduler {
    clock: SimClock,
    queue: BinaryHeap<Pending>,
    grants: HashMap<BonusId, BonusGrant>,
    next_id: u64,
}

impl BonusScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Record a grant that expires `duration` seconds from now.
    pub fn schedule(&mut self, radius_delta: f32, scale_delta: f32, duration: f32) -> BonusGrant {
        let id = BonusId(self.next_id);
        self.next_id += 1;
        let grant = BonusGrant {
            id,
            radius_delta,
            scale_delta,
            expires_at: self.clock.now() + duration as f64,
        };
        self.grants.insert(id, grant);
        self.queue.push(Pending { due: grant.expires_at, id });
        grant
    }

    /// Put a grant back so it expires on the next `advance`.
    pub fn requeue(&mut self, mut grant: BonusGrant) {
        grant.expires_at = self.clock.now();
        self.grants.insert(grant.id, grant);
        self.queue.push(Pending { due: grant.expires_at, id: grant.id });
    }

    /// Withdraw a pending grant without expiring it.
    pub fn cancel(&mut self, id: BonusId) -> Option<BonusGrant> {
        self.grants.remove(&id)
    }

    /// Move the clock forward and return every grant now due, earliest first.
    pub fn advance(&mut self, dt_seconds: f32) -> Vec<BonusGrant> {
        self.clock.advance(dt_seconds);
        let now = self.clock.now();

        let mut due = Vec::new();
        while let Some(next) = self.queue.peek() {
            if next.due > now {
                break;
            }
            let Some(next) = self.queue.pop() else { break };
            if let Some(grant) = self.grants.remove(&next.id) {
                due.push(grant);
            }
        }
        due
    }

    /// Remove and return every pending grant regardless of due time, earliest first.
    pub fn drain_all(&mut self) -> Vec<BonusGrant> {
        let mut all = Vec::with_capacity(self.grants.len());
        while let Some(next) = self.queue.pop() {
            if let Some(grant) = self.grants.remove(&next.id) {
                all.push(grant);
            }
        }
        all
    }

    pub fn pending_count(&self) -> usize {
        self.grants.len()
    }

    pub fn is_pending(&self, id: BonusId) -> bool {
        self.grants.contains_key(&id)
    }
}
