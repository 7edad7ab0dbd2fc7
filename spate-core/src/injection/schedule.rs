//! Pull-based arrival schedules
//!
//! A [`Schedule`] is a lazily produced sequence of non-negative time
//! offsets (millisecond resolution), non-decreasing by construction.
//! Consumers pull one offset at a time, so million-user schedules never
//! get materialized in bulk; abandoning a schedule mid-way is just
//! dropping it.

use std::time::Duration;

/// A lazily produced, ordered sequence of arrival offsets.
///
/// Wraps a boxed iterator so profile variants can compose schedules
/// without exposing their concrete iterator types. Exhaustion follows
/// standard iterator semantics: `next()` returns `None` past the end.
pub struct Schedule {
    inner: Box<dyn Iterator<Item = Duration> + Send>,
}

impl Schedule {
    pub(crate) fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Duration> + Send + 'static,
    {
        Self { inner: Box::new(iter) }
    }

    /// An empty schedule: no users, no offsets.
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// This schedule with every offset advanced by `offset`.
    ///
    /// A zero shift is returned unchanged rather than stacking a no-op
    /// adaptor, so chains of zero-duration profiles stay flat.
    pub fn shifted(self, offset: Duration) -> Self {
        if offset.is_zero() {
            self
        } else {
            Self::new(self.inner.map(move |t| t + offset))
        }
    }
}

impl Iterator for Schedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.inner.next()
    }
}

impl std::fmt::Debug for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Schedule(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schedule() {
        assert_eq!(Schedule::empty().count(), 0);
    }

    #[test]
    fn test_shifted_advances_every_offset() {
        let base = Schedule::new([0, 10, 25].into_iter().map(Duration::from_millis));
        let shifted: Vec<Duration> = base.shifted(Duration::from_millis(500)).collect();
        assert_eq!(
            shifted,
            vec![
                Duration::from_millis(500),
                Duration::from_millis(510),
                Duration::from_millis(525)
            ]
        );
    }

    #[test]
    fn test_zero_shift_is_identity() {
        let base = Schedule::new([5].into_iter().map(Duration::from_millis));
        let out: Vec<Duration> = base.shifted(Duration::ZERO).collect();
        assert_eq!(out, vec![Duration::from_millis(5)]);
    }
}
