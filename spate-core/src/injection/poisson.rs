//! Non-homogeneous Poisson arrivals via Lewis-Shedler thinning
//!
//! Candidates are drawn from a homogeneous process at the peak rate
//! (exponential gaps), then each candidate is kept with probability
//! `lambda(t) / max_lambda`, realizing the linearly varying target rate.
//! Rejected candidates do not disturb the running clock, so the candidate
//! process stays a valid Poisson process throughout.
//!
//! The RNG is built fresh from the profile's seed for every realization,
//! which makes `schedule` and `total_users` replayable: same seed, same
//! arrivals.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};

/// One seed-deterministic realization of the thinned process.
pub(crate) struct PoissonSchedule {
    rng: SmallRng,
    gaps: Exp<f64>,
    clock_secs: f64,
    duration_secs: f64,
    start_rate: f64,
    slope: f64,
    max_rate: f64,
}

impl PoissonSchedule {
    /// Rates are users per second; the caller has already validated them
    /// as finite, non-negative, and not both zero.
    pub(crate) fn new(duration: Duration, start_rate: f64, end_rate: f64, seed: u64) -> Self {
        let duration_secs = duration.as_secs_f64();
        let max_rate = start_rate.max(end_rate);
        let slope = if duration_secs > 0.0 {
            (end_rate - start_rate) / duration_secs
        } else {
            0.0
        };
        // max_rate > 0 here, so Exp::new cannot fail
        let gaps = Exp::new(max_rate).expect("peak rate validated positive at construction");
        Self {
            rng: SmallRng::seed_from_u64(seed),
            gaps,
            clock_secs: 0.0,
            duration_secs,
            start_rate,
            slope,
            max_rate,
        }
    }
}

impl Iterator for PoissonSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        loop {
            if self.clock_secs >= self.duration_secs {
                return None;
            }
            self.clock_secs += self.gaps.sample(&mut self.rng);
            if self.clock_secs >= self.duration_secs {
                return None;
            }
            let lambda = self.start_rate + self.slope * self.clock_secs;
            let accept: f64 = self.rng.random();
            if accept * self.max_rate < lambda {
                let millis = (self.clock_secs * 1000.0).round() as u64;
                return Some(Duration::from_millis(millis));
            }
        }
    }
}
