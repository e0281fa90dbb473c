//! Fixed-iteration k-means over RGB samples.
//!
//! Seeding takes the first `k` samples instead of random or k-means++
//! initialisation, and the loop runs a fixed number of iterations rather than
//! testing for convergence. Both keep extraction reproducible: the same samples
//! always produce the same centroids.

use crate::color::Rgb;

/// Number of assignment/update rounds performed by [`cluster`].
pub const ITERATIONS: usize = 10;

/// A cluster's representative color and the samples assigned to it in the
/// final iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centroid {
    pub color: Rgb,
    pub member_count: usize,
}

impl Centroid {
    /// Share of `total` samples owned by this centroid, in percent.
    pub fn percent(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.member_count as f64 * 100.0 / total as f64
    }
}

/// Initial centroids: the first `k` samples in input order.
///
/// With fewer than `k` samples the seeds cycle through the input, so the
/// result always has `k` entries. A duplicated seed never wins a tie against
/// its earlier copy and keeps its value for the whole run.
pub fn seed(samples: &[Rgb], k: usize) -> Vec<Rgb> {
    if samples.is_empty() {
        return Vec::new();
    }
    samples.iter().cycle().take(k).copied().collect()
}

/// Index of the centroid closest to `sample`. Ties go to the lowest index.
#[inline(always)]
fn nearest(sample: &Rgb, centroids: &[Rgb]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (idx, c) in centroids.iter().enumerate() {
        let dist = sample.distance_squared(c);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

/// One k-means round: assign every sample to its nearest centroid, then move
/// each centroid to the rounded mean of its members.
///
/// Returns the updated centroids and the member count of each. A centroid
/// with no members keeps its previous value.
pub fn step(samples: &[Rgb], centroids: &[Rgb]) -> (Vec<Rgb>, Vec<usize>) {
    let mut sums = vec![[0u64; 3]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for sample in samples {
        let idx = nearest(sample, centroids);
        sums[idx][0] += sample.r as u64;
        sums[idx][1] += sample.g as u64;
        sums[idx][2] += sample.b as u64;
        counts[idx] += 1;
    }

    let updated = centroids
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(&previous, (sum, &count))| {
            if count == 0 {
                return previous;
            }
            let n = count as u64;
            // round half up
            let mean = |total: u64| ((total + n / 2) / n) as u8;
            Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2]))
        })
        .collect();

    (updated, counts)
}

/// Cluster `samples` into exactly `k` centroids using [`ITERATIONS`] rounds.
///
/// Returns an empty vector when `samples` is empty or `k` is zero. Member
/// counts always sum to `samples.len()`.
pub fn cluster(samples: &[Rgb], k: usize) -> Vec<Centroid> {
    cluster_with_iterations(samples, k, ITERATIONS)
}

/// [`cluster`] with an explicit number of rounds.
///
/// With `iterations == 0` the seeds are returned with the member counts of a
/// single assignment pass.
pub fn cluster_with_iterations(samples: &[Rgb], k: usize, iterations: usize) -> Vec<Centroid> {
    if samples.is_empty() || k == 0 {
        return Vec::new();
    }

    let seeds = seed(samples, k);
    let (centroids, counts) = (0..iterations).fold(
        (seeds, Vec::new()),
        |(centroids, _), _| step(samples, &centroids),
    );

    // zero rounds: count members against the seeds themselves
    let counts = if iterations == 0 {
        let mut counts = vec![0usize; centroids.len()];
        for sample in samples {
            counts[nearest(sample, &centroids)] += 1;
        }
        counts
    } else {
        counts
    };

    centroids
        .into_iter()
        .zip(counts)
        .map(|(color, member_count)| Centroid { color, member_count })
        .collect()
}
