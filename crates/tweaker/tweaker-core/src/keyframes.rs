//! Sparse per-variable keyframe storage.

use std::collections::BTreeMap;

/// Mapping from integer step to value, with min/max bounds over the present keys.
///
/// Both bounds read as `0` while the store is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeStore {
    values: BTreeMap<i32, f64>,
    min_step: i32,
    max_step: i32,
}

impl KeyframeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value at `step`, widening the bounds as needed.
    pub fn set(&mut self, step: i32, value: f64) {
        if self.values.is_empty() {
            self.min_step = step;
            self.max_step = step;
        } else {
            self.min_step = self.min_step.min(step);
            self.max_step = self.max_step.max(step);
        }
        self.values.insert(step, value);
    }

    #[inline]
    pub fn get(&self, step: i32) -> Option<f64> {
        self.values.get(&step).copied()
    }

    #[inline]
    pub fn has(&self, step: i32) -> bool {
        self.values.contains_key(&step)
    }

    /// Remove the key at `step`, returning its value.
    ///
    /// Removing an endpoint moves that bound inward to the nearest remaining key.
    pub fn clear(&mut self, step: i32) -> Option<f64> {
        let removed = self.values.remove(&step);

        if self.values.is_empty() {
            self.min_step = 0;
            self.max_step = 0;
            return removed;
        }

        // The ordered map gives the inward scan result directly; it can never
        // pass the opposite bound because that key is still present.
        if step <= self.min_step {
            if let Some((&k, _)) = self.values.range(self.min_step..=self.max_step).next() {
                self.min_step = k;
            }
        }
        if step >= self.max_step {
            if let Some((&k, _)) = self.values.range(self.min_step..=self.max_step).next_back() {
                self.max_step = k;
            }
        }
        removed
    }

    /// Remove every key.
    pub fn clear_all(&mut self) {
        self.values.clear();
        self.min_step = 0;
        self.max_step = 0;
    }

    #[inline]
    pub fn min_step(&self) -> i32 {
        self.min_step
    }

    #[inline]
    pub fn max_step(&self) -> i32 {
        self.max_step
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keyframes in ascending step order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    /// Nearest present step at or below `step`, if any.
    #[inline]
    pub(crate) fn floor_key(&self, step: i32) -> Option<i32> {
        self.values.range(..=step).next_back().map(|(&k, _)| k)
    }

    /// Nearest present step at or above `step`, if any.
    #[inline]
    pub(crate) fn ceil_key(&self, step: i32) -> Option<i32> {
        self.values.range(step..).next().map(|(&k, _)| k)
    }
}

impl FromIterator<(i32, f64)> for KeyframeStore {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (step, value) in iter {
            store.set(step, value);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bounds(store: &KeyframeStore) {
        if store.is_empty() {
            assert_eq!((store.min_step(), store.max_step()), (0, 0));
        } else {
            let keys: Vec<i32> = store.iter().map(|(k, _)| k).collect();
            assert!(store.min_step() <= store.max_step());
            assert_eq!(store.min_step(), keys[0]);
            assert_eq!(store.max_step(), *keys.last().unwrap());
        }
    }

    #[test]
    fn first_insert_sets_both_bounds() {
        let mut store = KeyframeStore::new();
        store.set(7, 1.0);
        assert_eq!((store.min_step(), store.max_step()), (7, 7));
        store.set(-3, 2.0);
        store.set(12, 3.0);
        assert_eq!((store.min_step(), store.max_step()), (-3, 12));
    }

    #[test]
    fn overwrite_keeps_single_key() {
        let mut store = KeyframeStore::new();
        store.set(2, 1.0);
        store.set(2, 5.0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(2), Some(5.0));
        assert!(store.has(2));
        assert!(!store.has(3));
        assert_eq!(store.get(3), None);
    }

    #[test]
    fn clearing_endpoints_moves_bounds_inward() {
        let mut store: KeyframeStore = [(0, 0.0), (4, 1.0), (9, 2.0), (20, 3.0)]
            .into_iter()
            .collect();
        assert_eq!(store.clear(0), Some(0.0));
        assert_eq!(store.min_step(), 4);
        assert_eq!(store.clear(20), Some(3.0));
        assert_eq!(store.max_step(), 9);
        store.clear(4);
        assert_eq!((store.min_step(), store.max_step()), (9, 9));
        store.clear(9);
        assert!(store.is_empty());
        assert_eq!((store.min_step(), store.max_step()), (0, 0));
    }

    #[test]
    fn clearing_interior_or_absent_key_keeps_bounds() {
        let mut store: KeyframeStore = [(0, 0.0), (5, 1.0), (10, 2.0)].into_iter().collect();
        store.clear(5);
        assert_eq!((store.min_step(), store.max_step()), (0, 10));
        assert_eq!(store.clear(42), None);
        assert_eq!((store.min_step(), store.max_step()), (0, 10));
        assert_eq!(store.clear(-42), None);
        assert_eq!((store.min_step(), store.max_step()), (0, 10));
    }

    #[test]
    fn clear_all_empties_and_resets_bounds() {
        let mut store: KeyframeStore = [(-6, 1.0), (3, 2.0)].into_iter().collect();
        store.clear_all();
        assert!(store.is_empty());
        assert_bounds(&store);
        store.set(11, 4.0);
        assert_eq!((store.min_step(), store.max_step()), (11, 11));
    }

    #[test]
    fn bounds_hold_over_mixed_sequence() {
        let mut store = KeyframeStore::new();
        let ops: [(bool, i32); 14] = [
            (true, 5),
            (true, -2),
            (false, 5),
            (true, 30),
            (false, -2),
            (true, 7),
            (false, 30),
            (false, 7),
            (true, 1),
            (true, 1),
            (false, 100),
            (false, 1),
            (true, -9),
            (false, -9),
        ];
        for (insert, step) in ops {
            if insert {
                store.set(step, step as f64);
            } else {
                store.clear(step);
            }
            assert_bounds(&store);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn neighbour_lookup() {
        let store: KeyframeStore = [(2, 0.0), (8, 1.0)].into_iter().collect();
        assert_eq!(store.floor_key(5), Some(2));
        assert_eq!(store.ceil_key(5), Some(8));
        assert_eq!(store.floor_key(1), None);
        assert_eq!(store.ceil_key(9), None);
    }
}
