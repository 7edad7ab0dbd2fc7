//! Second/millisecond bucket generator
//!
//! Drives the deterministic rate-based profiles (Ramp, ConstantRate,
//! RampRate). A per-second count function says how many users arrive in
//! each whole second; that count is then sharded across the second's
//! 1000 millisecond slots with the even-partition utility, so arrivals
//! inside a busy second do not pile onto one timestamp.
//!
//! The generator is a small explicit state machine (current second,
//! current millisecond sub-iterator) pulled one offset at a time, which
//! keeps million-user ramps lazy.

use std::time::Duration;

use spate_common::partition_at;

const MILLIS_PER_SECOND: u64 = 1000;

/// Per-second count source. `FnMut` because RampRate carries a running
/// fractional remainder from one second to the next.
pub(crate) type PerSecondCounts = Box<dyn FnMut(u64) -> u64 + Send>;

/// Lazily emits one offset per user, ascending second by second and
/// millisecond by millisecond within each second.
pub(crate) struct BucketSchedule {
    counts: PerSecondCounts,
    seconds: u64,
    second: u64,
    current: Option<MillisBuckets>,
}

impl BucketSchedule {
    /// # Parameters
    /// - `seconds`: number of whole seconds to generate, seconds `[0, seconds)`
    /// - `counts`: users arriving within each second
    pub(crate) fn new(seconds: u64, counts: PerSecondCounts) -> Self {
        Self { counts, seconds, second: 0, current: None }
    }
}

impl Iterator for BucketSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        loop {
            if let Some(buckets) = &mut self.current {
                if let Some(offset) = buckets.next() {
                    return Some(offset);
                }
                self.current = None;
            }

            if self.second >= self.seconds {
                return None;
            }
            let count = (self.counts)(self.second);
            let base_ms = self.second * MILLIS_PER_SECOND;
            self.second += 1;
            if count > 0 {
                self.current = Some(MillisBuckets::new(base_ms, count));
            }
        }
    }
}

/// Shards one second's `total` users across its 1000 millisecond slots
/// and emits `partition_at(total, ms, 1000)` copies of each offset.
struct MillisBuckets {
    base_ms: u64,
    total: u64,
    ms: u64,
    remaining: u64,
}

impl MillisBuckets {
    fn new(base_ms: u64, total: u64) -> Self {
        Self {
            base_ms,
            total,
            ms: 0,
            remaining: partition_at(total, 0, MILLIS_PER_SECOND),
        }
    }
}

impl Iterator for MillisBuckets {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        loop {
            if self.remaining > 0 {
                self.remaining -= 1;
                return Some(Duration::from_millis(self.base_ms + self.ms));
            }
            self.ms += 1;
            if self.ms >= MILLIS_PER_SECOND {
                return None;
            }
            self.remaining = partition_at(self.total, self.ms, MILLIS_PER_SECOND);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(seconds: u64, counts: PerSecondCounts) -> Vec<Duration> {
        BucketSchedule::new(seconds, counts).collect()
    }

    #[test]
    fn test_emits_sum_of_counts() {
        let offsets = collect(3, Box::new(|s| [5u64, 0, 7][s as usize]));
        assert_eq!(offsets.len(), 12);
    }

    #[test]
    fn test_offsets_stay_inside_their_second() {
        let offsets = collect(2, Box::new(|_| 10));
        for offset in &offsets[..10] {
            assert!(offset.as_millis() < 1000, "first second leaked: {offset:?}");
        }
        for offset in &offsets[10..] {
            let ms = offset.as_millis();
            assert!((1000..2000).contains(&ms), "second second leaked: {offset:?}");
        }
    }

    #[test]
    fn test_offsets_non_decreasing() {
        let offsets = collect(5, Box::new(|s| 100 + s * 37));
        for pair in offsets.windows(2) {
            assert!(pair[0] <= pair[1], "out of order: {pair:?}");
        }
    }

    #[test]
    fn test_zero_count_seconds_skipped() {
        let offsets = collect(4, Box::new(|s| if s == 2 { 3 } else { 0 }));
        assert_eq!(offsets.len(), 3);
        for offset in &offsets {
            let ms = offset.as_millis();
            assert!((2000..3000).contains(&ms), "offset outside second 2: {offset:?}");
        }
    }

    #[test]
    fn test_dense_second_spreads_over_milliseconds() {
        // 2000 users in one second: every millisecond slot gets exactly 2
        let offsets = collect(1, Box::new(|_| 2000));
        assert_eq!(offsets.len(), 2000);
        for ms in 0..1000u64 {
            let copies =
                offsets.iter().filter(|o| o.as_millis() == u128::from(ms)).count();
            assert_eq!(copies, 2, "millisecond {ms} has {copies} users");
        }
    }

    #[test]
    fn test_sparse_second_avoids_clustering() {
        // 4 users in one second must land on 4 distinct milliseconds
        let offsets = collect(1, Box::new(|_| 4));
        assert_eq!(offsets.len(), 4);
        for pair in offsets.windows(2) {
            assert!(pair[0] < pair[1], "clustered arrivals: {offsets:?}");
        }
    }

    #[test]
    fn test_stateful_counts_called_once_per_second() {
        let mut calls = 0u64;
        let offsets: Vec<Duration> = BucketSchedule::new(
            3,
            Box::new(move |_| {
                calls += 1;
                calls
            }),
        )
        .collect();
        // 1 + 2 + 3 users
        assert_eq!(offsets.len(), 6);
    }
}
