//! The sampling kernel shared by every strategy.
//!
//! The unit circle sits inside the square [-1, 1] × [-1, 1]. The circle has
//! area π and the square area 4, so a point drawn uniformly from the square
//! lands inside the circle with probability π / 4.

use rand::distributions::{Distribution, Uniform};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use tracing::trace;

use crate::partition::Partition;

/// Per-worker random source. Never shared between workers.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: ChaCha8Rng,
    range: Uniform<f64>,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            range: Uniform::new_inclusive(-1.0, 1.0),
        }
    }

    #[inline]
    pub fn next_point(&mut self) -> (f64, f64) {
        let x = self.range.sample(&mut self.rng);
        let y = self.range.sample(&mut self.rng);
        (x, y)
    }

    /// Draw one point and report whether it falls inside the unit circle.
    #[inline]
    pub fn sample(&mut self) -> bool {
        let (x, y) = self.next_point();
        is_inside(x, y)
    }

    pub fn count_hits(&mut self, iterations: u64) -> u64 {
        let mut inside = 0;
        for _ in 0..iterations {
            if self.sample() {
                inside += 1;
            }
        }
        inside
    }
}

#[inline]
fn magnitude(x: f64, y: f64) -> f64 {
    (x * x + y * y).sqrt()
}

/// Whether `(x, y)` lies on or inside the unit circle.
#[inline]
pub fn is_inside(x: f64, y: f64) -> bool {
    magnitude(x, y) <= 1.0
}

/// Default worker body: build the partition's own stream and count its hits.
pub fn sample_partition(partition: Partition) -> u64 {
    let _span = tracing::debug_span!(
        "approximation",
        worker = partition.worker,
        iterations = partition.iterations,
        seed = partition.seed
    )
    .entered();

    let mut stream = RandomStream::new(partition.seed);
    let hits = stream.count_hits(partition.iterations);
    trace!(worker = partition.worker, hits, "partition sampled");
    hits
}
