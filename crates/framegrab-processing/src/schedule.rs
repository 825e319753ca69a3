//! Sampling-schedule computation.
//!
//! Converts a known video duration into the ordered list of capture
//! timestamps, or falls back to a bounded fixed-length window when the
//! duration is unknown. Partial results beat failing the whole pipeline
//! when container metadata is malformed.

/// Ordered sequence of capture timestamps, in whole seconds.
///
/// Invariants: strictly increasing, starts at 0, every element below the
/// source duration under the primary policy.
pub type SampleSchedule = Vec<u64>;

/// Policy for converting a duration into sample timestamps.
#[derive(Clone, Copy, Debug)]
pub struct SamplePolicy {
    pub interval_secs: u64,
    /// Number of samples taken when the duration is unknown or invalid.
    pub fallback_sample_count: usize,
}

impl SamplePolicy {
    pub fn new(interval_secs: u64, fallback_sample_count: usize) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
            fallback_sample_count,
        }
    }

    /// Primary policy: `0, i, 2i, …` strictly below `duration_secs`.
    ///
    /// A duration shorter than one interval yields an empty schedule, which
    /// callers must treat as valid output (zero frames), not an error.
    pub fn schedule(&self, duration_secs: u64) -> SampleSchedule {
        let count = (duration_secs / self.interval_secs) as usize;
        (0..count).map(|i| i as u64 * self.interval_secs).collect()
    }

    /// Fallback policy for unknown durations: a fixed-length window at the
    /// same interval.
    pub fn fallback_schedule(&self) -> SampleSchedule {
        (0..self.fallback_sample_count)
            .map(|i| i as u64 * self.interval_secs)
            .collect()
    }
}
