//! Brute-force ground-plane broad phase
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2: the broad
//! phase cheaply culls pairs that cannot be colliding. Here every tracked
//! object contributes one X/Z footprint and all unordered pairs are tested,
//! which is plenty for the tens-to-hundreds of objects an interactive scene
//! holds.

use std::hash::Hash;

use crate::foundation::collections::IndexMap;
use crate::physics::collision::FootprintRect;

/// A pair of keys whose footprints overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroadPhasePair<K> {
    /// Key stored earlier in the index
    pub first: K,
    /// Key stored later in the index
    pub second: K,
    /// Overlapping sub-rectangle, for diagnostics only
    pub overlap: FootprintRect,
}

/// One footprint per key, stored densely for cache-friendly pair scans.
///
/// This is the only copy of each footprint; the pipeline reads it back from
/// here.
#[derive(Debug, Clone)]
pub struct BroadPhaseIndex<K> {
    rects: IndexMap<K, FootprintRect>,
}

impl<K: Copy + Eq + Hash> BroadPhaseIndex<K> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            rects: IndexMap::new(),
        }
    }

    /// Insert or replace a footprint
    pub fn insert(&mut self, key: K, rect: FootprintRect) {
        self.rects.insert(key, rect);
    }

    /// Replace an existing footprint; returns `false` if the key is unknown
    pub fn update(&mut self, key: K, rect: FootprintRect) -> bool {
        match self.rects.get_mut(&key) {
            Some(slot) => {
                *slot = rect;
                true
            }
            None => false,
        }
    }

    /// Remove a footprint. The last entry takes the freed slot, so scan
    /// order is insertion order only until the first removal.
    pub fn remove(&mut self, key: &K) -> Option<FootprintRect> {
        self.rects.swap_remove(key)
    }

    /// Footprint stored for a key
    pub fn get(&self, key: &K) -> Option<&FootprintRect> {
        self.rects.get(key)
    }

    /// Overlap test between two stored footprints; `None` if either key is
    /// missing or they do not overlap
    pub fn check_pair(&self, a: &K, b: &K) -> Option<FootprintRect> {
        self.rects.get(a)?.intersection(self.rects.get(b)?)
    }

    /// Test all unordered pairs
    pub fn check_all(&self) -> Vec<BroadPhasePair<K>> {
        let entries = self.rects.as_slice();
        let mut pairs = Vec::new();

        for (i, (first, rect_a)) in entries.iter().enumerate() {
            for (second, rect_b) in entries[i + 1..].iter() {
                if let Some(overlap) = rect_a.intersection(rect_b) {
                    pairs.push(BroadPhasePair {
                        first: *first,
                        second: *second,
                        overlap,
                    });
                }
            }
        }

        pairs
    }

    /// Number of stored footprints
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Remove every footprint
    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for BroadPhaseIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, z: f32, size: f32) -> FootprintRect {
        FootprintRect::new(x, z, size, size)
    }

    #[test]
    fn test_check_all_reports_each_pair_once() {
        let mut index = BroadPhaseIndex::new();
        index.insert(0u32, square(0.0, 0.0, 2.0));
        index.insert(1, square(1.0, 1.0, 2.0));
        index.insert(2, square(1.5, 0.0, 2.0));
        index.insert(3, square(50.0, 50.0, 2.0));

        let pairs: Vec<(u32, u32)> = index
            .check_all()
            .iter()
            .map(|pair| (pair.first, pair.second))
            .collect();

        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_overlap_rect_is_reported() {
        let mut index = BroadPhaseIndex::new();
        index.insert("a", square(0.0, 0.0, 2.0));
        index.insert("b", square(1.0, 1.5, 2.0));

        let pairs = index.check_all();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].overlap, FootprintRect::new(1.0, 1.5, 1.0, 0.5));
    }

    #[test]
    fn test_update_and_remove() {
        let mut index = BroadPhaseIndex::new();
        index.insert(1u32, square(0.0, 0.0, 1.0));
        index.insert(2, square(5.0, 5.0, 1.0));
        assert!(index.check_all().is_empty());

        assert!(index.update(2, square(0.5, 0.5, 1.0)));
        assert!(index.check_pair(&1, &2).is_some());

        assert!(index.remove(&1).is_some());
        assert!(index.check_all().is_empty());
        assert!(!index.update(1, square(0.0, 0.0, 1.0)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_check_pair_missing_key() {
        let mut index = BroadPhaseIndex::new();
        index.insert(1u32, square(0.0, 0.0, 1.0));
        assert!(index.check_pair(&1, &9).is_none());
    }

    #[test]
    fn test_removal_moves_last_entry_into_gap() {
        let mut index = BroadPhaseIndex::new();
        index.insert(1u32, square(0.0, 0.0, 2.0));
        index.insert(2, square(1.0, 0.0, 2.0));
        index.insert(3, square(0.5, 0.0, 2.0));

        index.remove(&1);
        let pairs: Vec<(u32, u32)> = index
            .check_all()
            .iter()
            .map(|pair| (pair.first, pair.second))
            .collect();

        assert_eq!(pairs, vec![(3, 2)]);
        assert_eq!(index.get(&3), Some(&square(0.5, 0.0, 2.0)));
    }
}
