//! Split compositor: repeated step/separator stages
//!
//! Repeats a step profile, interleaved with a separator profile, to
//! reach the largest user count not exceeding a cap that is an exact
//! number of whole repetitions. Stages are expanded with an explicit
//! iterative state machine (current stage schedule + cumulative shift)
//! rather than nested adaptors, so a split with thousands of repetitions
//! costs O(1) stack and O(1) per-pull overhead.

use std::time::Duration;

use super::profile::InjectionProfile;
use super::schedule::Schedule;

/// What the state machine plays after the current stage drains.
enum NextStage {
    Separator,
    Step,
    Continuation,
    Done,
}

pub(crate) struct SplitSchedule {
    step: InjectionProfile,
    separator: InjectionProfile,
    /// Whole (separator, step) repetitions still to play after the
    /// current step finishes.
    pairs_left: u64,
    /// Sum of the durations of every completed stage.
    shift: Duration,
    current: Schedule,
    next_stage: NextStage,
    continuation: Option<Schedule>,
}

impl SplitSchedule {
    /// `repetitions` is the count of (separator, step) pairs following
    /// the leading step; the caller has already checked that the step
    /// contributes at least one user and that the cap admits a step.
    pub(crate) fn new(
        step: InjectionProfile,
        separator: InjectionProfile,
        repetitions: u64,
        continuation: Schedule,
    ) -> Self {
        let current = step.schedule(Schedule::empty());
        Self {
            step,
            separator,
            pairs_left: repetitions,
            shift: Duration::ZERO,
            current,
            next_stage: NextStage::Separator,
            continuation: Some(continuation),
        }
    }

    /// Drains the finished stage and swaps in the next one, advancing the
    /// cumulative shift by the finished stage's duration.
    fn advance(&mut self) -> bool {
        match self.next_stage {
            NextStage::Separator => {
                self.shift += self.step.duration();
                if self.pairs_left == 0 {
                    self.next_stage = NextStage::Continuation;
                    return self.advance_to_continuation();
                }
                self.current = self.separator.schedule(Schedule::empty());
                self.next_stage = NextStage::Step;
                true
            }
            NextStage::Step => {
                self.shift += self.separator.duration();
                self.current = self.step.schedule(Schedule::empty());
                self.pairs_left -= 1;
                self.next_stage = NextStage::Separator;
                true
            }
            NextStage::Continuation => self.advance_to_continuation(),
            NextStage::Done => false,
        }
    }

    fn advance_to_continuation(&mut self) -> bool {
        self.next_stage = NextStage::Done;
        match self.continuation.take() {
            Some(cont) => {
                self.current = cont;
                true
            }
            None => false,
        }
    }
}

impl Iterator for SplitSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        loop {
            if let Some(offset) = self.current.next() {
                return Some(offset + self.shift);
            }
            if !self.advance() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_once(users: u64) -> InjectionProfile {
        InjectionProfile::at_once(users)
    }

    fn pause(secs: u64) -> InjectionProfile {
        InjectionProfile::nothing_for(Duration::from_secs(secs))
    }

    #[test]
    fn test_step_separator_step_layout() {
        // step AtOnce(3), separator 1s pause, 2 extra repetitions
        let offsets: Vec<Duration> =
            SplitSchedule::new(at_once(3), pause(1), 2, Schedule::empty()).collect();
        let expect: Vec<Duration> =
            [0, 0, 0, 1000, 1000, 1000, 2000, 2000, 2000]
                .into_iter()
                .map(Duration::from_millis)
                .collect();
        assert_eq!(offsets, expect);
    }

    #[test]
    fn test_continuation_shifted_past_all_stages() {
        let cont = at_once(1).schedule(Schedule::empty());
        let offsets: Vec<Duration> =
            SplitSchedule::new(at_once(2), pause(2), 1, cont).collect();
        // 2 users at 0, 2 at 2000, continuation user also at 2000 (final
        // step has zero duration)
        assert_eq!(offsets.len(), 5);
        assert_eq!(*offsets.last().unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_large_repetition_count_stays_flat() {
        // Deep recursion here would blow the stack long before 100k stages
        let n = 100_000;
        let total = SplitSchedule::new(at_once(1), pause(0), n, Schedule::empty()).count();
        assert_eq!(total as u64, n + 1);
    }

    #[test]
    fn test_separator_users_are_emitted() {
        let offsets: Vec<Duration> =
            SplitSchedule::new(at_once(2), at_once(1), 1, Schedule::empty()).collect();
        // step(2) + separator(1) + step(2), all zero-duration stages
        assert_eq!(offsets, vec![Duration::ZERO; 5]);
    }
}
