//! Guide tables for indexed segment search.

/// Maps a uniform fraction of the total hat area to a segment from which a
/// forward scan reaches the segment containing that fraction.
#[derive(Clone, Debug, Default)]
pub struct GuideTable {
    entries: Vec<usize>,
}

impl GuideTable {
    /// Builds a guide table with `size` entries.
    ///
    /// `order` lists `(segment index, cumulative area)` pairs in traversal
    /// order and `total` is the cumulative area of the last segment.
    pub fn build<I>(order: I, total: f64, size: usize) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let order: Vec<(usize, f64)> = order.into_iter().collect();
        let size = size.max(1);
        let mut entries = Vec::with_capacity(size);
        if order.is_empty() {
            return Self { entries };
        }

        let last = order.len() - 1;
        let step = total / size as f64;
        let mut i = 0;
        for j in 0..size {
            let target = step * j as f64;
            while i < last && order[i].1 <= target {
                i += 1;
            }
            entries.push(order[i].0);
        }

        Self { entries }
    }

    /// Segment from which to start scanning for fraction `u` in `[0, 1)`.
    #[inline]
    pub fn start(&self, u: f64) -> Option<usize> {
        let n = self.entries.len();
        if n == 0 {
            return None;
        }
        let j = ((u * n as f64) as usize).min(n - 1);

        Some(self.entries[j])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
