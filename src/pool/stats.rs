// File: src/pool/stats.rs
use std::time::Instant;

/// Usage statistics for a single instance pool.
///
/// Tracks how often spawns were served from the free stack versus on-demand
/// instantiation, and how deep the issued set ever got.
#[derive(Debug, Clone)]
pub struct PoolStats {
    /// Total spawn requests served
    pub total_spawns: u64,
    /// Spawns served by reusing a pooled instance
    pub pooled_spawns: u64,
    /// Spawns that had to instantiate a fresh clone on demand
    pub demand_instantiations: u64,
    /// Total recycle calls that returned an instance to the free stack
    pub total_recycles: u64,
    /// Recycle calls that destroyed an untracked instance instead
    pub destroyed_on_recycle: u64,
    /// Instances materialized eagerly at pool creation
    pub preloaded: u64,
    /// Highest number of simultaneously issued instances
    pub peak_issued: usize,
    /// Creation time of the pool
    pub creation_time: Instant,
}

impl PoolStats {
    /// Create a new statistics tracker.
    pub fn new() -> Self {
        Self {
            total_spawns: 0,
            pooled_spawns: 0,
            demand_instantiations: 0,
            total_recycles: 0,
            destroyed_on_recycle: 0,
            preloaded: 0,
            peak_issued: 0,
            creation_time: Instant::now(),
        }
    }

    /// Record a spawn, noting whether it reused a pooled instance.
    pub fn record_spawn(&mut self, reused: bool, issued_now: usize) {
        self.total_spawns += 1;
        if reused {
            self.pooled_spawns += 1;
        } else {
            self.demand_instantiations += 1;
        }
        self.peak_issued = self.peak_issued.max(issued_now);
    }

    /// Record a recycle, noting whether the instance went back to the pool.
    pub fn record_recycle(&mut self, returned: bool) {
        if returned {
            self.total_recycles += 1;
        } else {
            self.destroyed_on_recycle += 1;
        }
    }

    /// Record eager preloading of `count` instances.
    pub fn record_preload(&mut self, count: usize) {
        self.preloaded += count as u64;
    }

    /// Fraction of spawns served without instantiating (0.0 to 1.0).
    pub fn reuse_ratio(&self) -> f64 {
        if self.total_spawns == 0 {
            1.0
        } else {
            self.pooled_spawns as f64 / self.total_spawns as f64
        }
    }

    /// Spawn requests per second since the pool was created.
    pub fn spawn_rate(&self) -> f64 {
        let elapsed = self.creation_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_spawns as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Reset all statistics (useful for benchmarking).
    pub fn reset_stats(&mut self) {
        *self = Self::new();
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new()
    }
}
