//! Cell-bucketed index over live weeds.
//!
//! Jittered samples can stray up to half a cell outside the cell they were drawn
//! for, so weeds are bucketed by the cell their position falls in, clamped to the
//! grid. Only occupied cells get a bucket. A cut only visits buckets
//! overlapping its bounding square.

use std::collections::HashMap;

use crate::core::types::Vec2;
use crate::field::FieldConfig;
use crate::math::Rect;
use crate::weeds::instance::Weed;

pub struct WeedIndex {
    dim: u32,
    origin: f32,
    box_width: f32,
    buckets: HashMap<usize, Vec<Weed>>,
    len: usize,
}

impl WeedIndex {
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            dim: config.grid_dim(),
            origin: -config.half_width(),
            box_width: config.box_width,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    fn axis_bucket(&self, v: f32) -> u32 {
        let max = (self.dim - 1) as f32;
        ((v - self.origin) / self.box_width).floor().clamp(0.0, max) as u32
    }

    fn bucket_of(&self, p: Vec2) -> usize {
        self.axis_bucket(p.x) as usize * self.dim as usize + self.axis_bucket(p.y) as usize
    }

    pub fn insert(&mut self, weed: Weed) {
        let bucket = self.bucket_of(weed.position);
        self.buckets.entry(bucket).or_default().push(weed);
        self.len += 1;
    }

    /// Remove every weed strictly within `radius` of `center`, handing each to
    /// `on_removed` before it is dropped. Returns the number removed.
    pub fn remove_within(
        &mut self,
        center: Vec2,
        radius: f32,
        mut on_removed: impl FnMut(&Weed),
    ) -> usize {
        if self.len == 0 || !(radius > 0.0) || !center.is_finite() {
            return 0;
        }

        let query = Rect::around_circle(center, radius);
        let (x0, x1) = (self.axis_bucket(query.min.x), self.axis_bucket(query.max.x));
        let (z0, z1) = (self.axis_bucket(query.min.y), self.axis_bucket(query.max.y));

        let mut removed = 0;
        let mut sweep = |bucket: &mut Vec<Weed>| {
            bucket.retain(|weed| {
                if weed.is_cut_by(center, radius) {
                    on_removed(weed);
                    removed += 1;
                    false
                } else {
                    true
                }
            });
        };

        let spanned = (x1 - x0 + 1) as usize * (z1 - z0 + 1) as usize;
        if spanned >= self.buckets.len() {
            // Wide cut: cheaper to walk the occupied buckets than the cell span.
            self.buckets.values_mut().for_each(&mut sweep);
            self.buckets.retain(|_, bucket| !bucket.is_empty());
        } else {
            for ix in x0..=x1 {
                for iz in z0..=z1 {
                    let key = ix as usize * self.dim as usize + iz as usize;
                    let emptied = match self.buckets.get_mut(&key) {
                        Some(bucket) => {
                            sweep(bucket);
                            bucket.is_empty()
                        }
                        None => false,
                    };
                    if emptied {
                        self.buckets.remove(&key);
                    }
                }
            }
        }
        self.len -= removed;
        removed
    }

    /// Live weeds, grouped by bucket in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Weed> {
        self.buckets.values().flatten()
    }

    /// Number of occupied cells.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::CellCoord;

    fn config() -> FieldConfig {
        FieldConfig { field_width: 20.0, box_width: 2.0, ..Default::default() }
    }

    fn weed(x: f32, z: f32, slot: usize) -> Weed {
        Weed { position: Vec2::new(x, z), cell: CellCoord::new(0, 0), slot, patch: 0 }
    }

    #[test]
    fn test_remove_within_matches_linear_scan() {
        let mut index = WeedIndex::new(&config());
        let mut all = Vec::new();
        let mut slot = 0;
        for i in 0..40 {
            for j in 0..40 {
                // Includes points just outside the field from edge jitter.
                let w = weed(-11.0 + i as f32 * 0.55, -11.0 + j as f32 * 0.55, slot);
                index.insert(w);
                all.push(w);
                slot += 1;
            }
        }

        let center = Vec2::new(-9.0, 3.3);
        let radius = 2.7;
        let mut removed_slots = Vec::new();
        let n = index.remove_within(center, radius, |w| removed_slots.push(w.slot));

        let mut expected: Vec<usize> = all.iter()
            .filter(|w| w.position.distance(center) < radius)
            .map(|w| w.slot)
            .collect();
        removed_slots.sort_unstable();
        expected.sort_unstable();
        assert_eq!(removed_slots, expected);
        assert_eq!(n, expected.len());
        assert_eq!(index.len(), all.len() - n);
        assert!(index.iter().all(|w| w.position.distance(center) >= radius));
    }

    #[test]
    fn test_huge_radius_clears_everything() {
        let mut index = WeedIndex::new(&config());
        index.insert(weed(-10.9, -10.9, 0));
        index.insert(weed(10.9, 10.9, 1));
        assert_eq!(index.remove_within(Vec2::ZERO, 1.0e6, |_| {}), 2);
        assert!(index.is_empty());
    }

    #[test]
    fn test_degenerate_queries_are_noops() {
        let mut index = WeedIndex::new(&config());
        index.insert(weed(1.0, 1.0, 0));
        assert_eq!(index.remove_within(Vec2::new(1.0, 1.0), 0.0, |_| {}), 0);
        assert_eq!(index.remove_within(Vec2::new(1.0, 1.0), -1.0, |_| {}), 0);
        assert_eq!(index.remove_within(Vec2::new(f32::NAN, 1.0), 5.0, |_| {}), 0);
        assert_eq!(index.remove_within(Vec2::new(1.0, 1.0), f32::NAN, |_| {}), 0);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_only_occupied_cells_hold_buckets() {
        let mut index = WeedIndex::new(&config());
        assert_eq!(index.bucket_count(), 0);
        index.insert(weed(1.0, 1.0, 0));
        index.insert(weed(1.5, 1.5, 1));
        index.insert(weed(-7.0, 5.0, 2));
        assert_eq!(index.bucket_count(), 2);

        assert_eq!(index.remove_within(Vec2::new(-7.0, 5.0), 0.5, |_| {}), 1);
        assert_eq!(index.bucket_count(), 1);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_query_outside_field_reaches_edge_buckets() {
        let mut index = WeedIndex::new(&config());
        index.insert(weed(-10.8, 0.0, 0));
        assert_eq!(index.remove_within(Vec2::new(-11.5, 0.0), 1.0, |_| {}), 1);
    }
}
