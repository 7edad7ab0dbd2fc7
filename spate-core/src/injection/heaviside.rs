//! Smoothed-step ("Heaviside") arrivals
//!
//! Approximates a step in active users with an S-shaped arrival density:
//! user `i` of `n` arrives at the inverse-erf image of `i / (n + 2)`,
//! scaled so the sequence spans the profile duration. Arrivals are dense
//! around the midpoint and sparse at both ends.

use std::time::Duration;

use spate_common::erfinv;

/// Lazily indexed S-curve schedule; offsets are strictly increasing
/// before millisecond rounding.
pub(crate) struct HeavisideSchedule {
    users: u64,
    next_user: u64,
    t0: f64,
    scale_ms: f64,
}

impl HeavisideSchedule {
    /// The caller has already peeled off the degenerate cases
    /// (`users == 0`, zero duration).
    pub(crate) fn new(users: u64, duration: Duration) -> Self {
        let n = users as f64;
        // Image of the first user; its magnitude anchors the curve so
        // user 1 lands at offset ~0.
        let t0 = erfinv(2.0 / (n + 2.0) - 1.0).abs();
        let scale_ms = duration.as_millis() as f64 / (2.0 * t0);
        Self { users, next_user: 1, t0, scale_ms }
    }
}

impl Iterator for HeavisideSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.next_user > self.users {
            return None;
        }
        let x = self.next_user as f64 / (self.users as f64 + 2.0);
        self.next_user += 1;
        let t = erfinv(2.0 * x - 1.0);
        let millis = (self.scale_ms * (t + self.t0)).round() as u64;
        Some(Duration::from_millis(millis))
    }
}
