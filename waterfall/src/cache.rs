use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{ItemKey, MeasureOutcome};

/// Measured item heights keyed by item identity, plus a version counter.
///
/// The map is never compared by value: every material change bumps `version`, and consumers
/// recompute when the version they last saw differs from the current one.
///
/// Entries are never evicted on their own. A key that disappears from the item list keeps its
/// measurement, so an item that reappears later reuses it.
#[derive(Clone, Debug)]
pub struct HeightCache<K> {
    heights: KeyMap<K, f64>,
    version: u64,
}

impl<K: ItemKey> HeightCache<K> {
    pub fn new() -> Self {
        Self {
            heights: KeyMap::new(),
            version: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.heights.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.heights.contains_key(key)
    }

    /// Records an observed height with hysteresis.
    ///
    /// The entry is written when the key has no entry yet, or when `height` differs from the
    /// cached value by at least `threshold`. Smaller deltas are ignored so that sub-pixel
    /// re-measurements cannot feed back into endless relayouts.
    pub fn record(&mut self, key: K, height: f64, threshold: f64) -> MeasureOutcome {
        if !height.is_finite() || height < 0.0 {
            return MeasureOutcome::Rejected;
        }
        let outcome = match self.heights.get(&key) {
            None => MeasureOutcome::Inserted,
            Some(&previous) => {
                let delta = height - previous;
                if delta < threshold && delta > -threshold {
                    return MeasureOutcome::Ignored;
                }
                MeasureOutcome::Updated { previous }
            }
        };
        self.heights.insert(key, height);
        self.bump();
        outcome
    }

    /// Replaces all entries. Invalid heights are skipped.
    pub fn replace(&mut self, entries: impl IntoIterator<Item = (K, f64)>) -> usize {
        self.heights.clear();
        for (k, h) in entries {
            if h.is_finite() && h >= 0.0 {
                self.heights.insert(k, h);
            }
        }
        self.bump();
        self.heights.len()
    }

    pub fn clear(&mut self) {
        if self.heights.is_empty() {
            return;
        }
        self.heights.clear();
        self.bump();
    }

    pub fn for_each(&self, mut f: impl FnMut(&K, f64)) {
        for (k, h) in self.heights.iter() {
            f(k, *h);
        }
    }

    pub fn export(&self) -> Vec<(K, f64)> {
        let mut out = Vec::with_capacity(self.heights.len());
        self.for_each(|k, h| out.push((k.clone(), h)));
        out
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl<K: ItemKey> Default for HeightCache<K> {
    fn default() -> Self {
        Self::new()
    }
}
