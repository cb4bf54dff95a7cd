//! Process churn estimation.
//!
//! Compares the non-kernel PID list against the previous cycle's snapshot.
//! When the two lists are highly similar the workload is assumed unchanged
//! and routine resource checks can be skipped for the cycle.

/// Tracks the previous PID snapshot and the similarity cutoff.
#[derive(Debug)]
pub struct ChurnTracker {
    min_similarity: f32,
    previous: Vec<u32>,
}

impl ChurnTracker {
    pub fn new(min_similarity: f32) -> Self {
        Self {
            min_similarity,
            previous: Vec::new(),
        }
    }

    /// Compare a fresh snapshot against the previous one and store it.
    ///
    /// Returns true when the lists are similar enough that resource checks
    /// may be skipped this cycle (unless an override forces one).
    pub fn update(&mut self, current: Vec<u32>) -> bool {
        let ratio = similarity_ratio(&current, &self.previous);
        log::debug!(
            "PID list similarity: {:.1}% (minimum to skip checks: {:.1}%)",
            ratio,
            self.min_similarity
        );
        self.previous = current;
        let same = ratio > self.min_similarity;
        if same {
            log::info!("PID lists sufficiently similar: skipping resource checks unless overrides activate");
        } else {
            log::info!("PID lists sufficiently different: performing resource checks");
        }
        same
    }
}

/// Sequence similarity in [0, 100].
///
/// LCS-based measure: `200 * lcs(a, b) / (len(a) + len(b))`. Identical
/// sequences score 100; two empty snapshots count as identical. The measure
/// is order-sensitive by design, so a pure reordering of the same PIDs
/// scores below 100. This is an accepted heuristic, not a set comparison.
pub fn similarity_ratio(a: &[u32], b: &[u32]) -> f32 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    // Single-row LCS table; PID lists are small enough that O(n*m) is fine.
    let mut row = vec![0usize; b.len() + 1];
    for &x in a {
        let mut prev_diag = 0;
        for (j, &y) in b.iter().enumerate() {
            let tmp = row[j + 1];
            row[j + 1] = if x == y {
                prev_diag + 1
            } else {
                row[j + 1].max(row[j])
            };
            prev_diag = tmp;
        }
    }
    let lcs = row[b.len()];

    (2.0 * lcs as f32 / total as f32) * 100.0
}
