//! Injection profile variants
//!
//! The profile sum type and its two-operation contract: `total_users`
//! (how many users the profile contributes) and `schedule` (the
//! profile's own offsets followed by a continuation shifted forward by
//! the profile's duration). Every consumer matches on the closed set of
//! variants, so adding a policy is a compile-visible change.
//!
//! All parameter validation happens in the constructors; a profile that
//! exists can always produce its schedule.

use std::iter;
use std::time::Duration;

use spate_common::partition_at;

use crate::error::{Error, Result};

use super::buckets::{BucketSchedule, PerSecondCounts};
use super::heaviside::HeavisideSchedule;
use super::poisson::PoissonSchedule;
use super::schedule::Schedule;
use super::split::SplitSchedule;

/// A declarative arrival policy under the open workload model.
///
/// Immutable once constructed; stochastic variants carry a seed, never a
/// live RNG, so realizing a schedule twice replays the same arrivals.
#[derive(Debug, Clone)]
pub enum InjectionProfile {
    /// All users at offset zero.
    AtOnce { users: u64 },
    /// No users; occupies timeline so later profiles start after it.
    NothingFor { duration: Duration },
    /// `users` spread evenly across the duration's whole seconds.
    Ramp { users: u64, duration: Duration },
    /// Constant arrival rate in users per second.
    ConstantRate { rate: f64, duration: Duration },
    /// Arrival rate varying linearly from `start_rate` to `end_rate`.
    RampRate { start_rate: f64, end_rate: f64, duration: Duration },
    /// S-curve (smoothed step) arrival density via the inverse erf.
    Heaviside { users: u64, duration: Duration },
    /// Non-homogeneous Poisson arrivals, rate linear between the bounds.
    Poisson { duration: Duration, start_rate: f64, end_rate: f64, seed: u64 },
    /// Largest whole number of step (+ separator) repetitions fitting
    /// under a user cap.
    Split {
        possible_users: u64,
        step: Box<InjectionProfile>,
        separator: Box<InjectionProfile>,
    },
}

fn validate_rate(name: &str, rate: f64) -> Result<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(Error::Config(format!(
            "{name} must be finite and non-negative, got {rate}"
        )));
    }
    Ok(())
}

fn validate_rate_needs_duration(peak_rate: f64, duration: Duration) -> Result<()> {
    if peak_rate > 0.0 && duration.is_zero() {
        return Err(Error::Config(format!(
            "a positive rate ({peak_rate} users/s) cannot be injected over a zero duration"
        )));
    }
    Ok(())
}

/// `duration * n` without the `u32` cap of `Duration`'s `Mul` impl.
fn repeat_duration(duration: Duration, n: u64) -> Duration {
    let nanos = duration.as_nanos() * u128::from(n);
    Duration::new((nanos / 1_000_000_000) as u64, (nanos % 1_000_000_000) as u32)
}

impl InjectionProfile {
    /// Inject `users` all at offset zero.
    pub fn at_once(users: u64) -> Self {
        Self::AtOnce { users }
    }

    /// Inject nobody for `duration`; later profiles start after it.
    pub fn nothing_for(duration: Duration) -> Self {
        Self::NothingFor { duration }
    }

    /// Spread `users` evenly across `duration`.
    ///
    /// Degenerates to [`Self::nothing_for`] behavior when `users` is zero
    /// and to [`Self::at_once`] behavior when the duration is zero.
    pub fn ramp(users: u64, duration: Duration) -> Self {
        Self::Ramp { users, duration }
    }

    /// Inject at a constant `rate` (users per second) for `duration`.
    ///
    /// Total users is `rate * duration` rounded to the nearest integer.
    pub fn constant_rate(rate: f64, duration: Duration) -> Result<Self> {
        validate_rate("rate", rate)?;
        validate_rate_needs_duration(rate, duration)?;
        Ok(Self::ConstantRate { rate, duration })
    }

    /// Inject at a rate moving linearly from `start_rate` to `end_rate`
    /// over `duration`; total users is the trapezoidal integral, rounded
    /// to the nearest integer.
    pub fn ramp_rate(start_rate: f64, end_rate: f64, duration: Duration) -> Result<Self> {
        validate_rate("start rate", start_rate)?;
        validate_rate("end rate", end_rate)?;
        validate_rate_needs_duration(start_rate.max(end_rate), duration)?;
        Ok(Self::RampRate { start_rate, end_rate, duration })
    }

    /// Inject `users` along an S-shaped density spanning `duration`,
    /// dense at the midpoint and sparse at both ends.
    pub fn heaviside(users: u64, duration: Duration) -> Self {
        Self::Heaviside { users, duration }
    }

    /// Sample a Poisson process whose rate moves linearly from
    /// `start_rate` to `end_rate` over `duration`.
    ///
    /// The seed is mandatory: the realized arrivals (and therefore the
    /// realized user count) are a pure function of the parameters.
    pub fn poisson(
        duration: Duration,
        start_rate: f64,
        end_rate: f64,
        seed: u64,
    ) -> Result<Self> {
        validate_rate("start rate", start_rate)?;
        validate_rate("end rate", end_rate)?;
        validate_rate_needs_duration(start_rate.max(end_rate), duration)?;
        Ok(Self::Poisson { duration, start_rate, end_rate, seed })
    }

    /// Repeat `step`, interleaved with `separator`, up to the largest
    /// whole-repetition user count not exceeding `possible_users`.
    ///
    /// The step must contribute at least one user, otherwise repetition
    /// count would be unbounded.
    pub fn split(
        possible_users: u64,
        step: InjectionProfile,
        separator: InjectionProfile,
    ) -> Result<Self> {
        if step.total_users() == 0 {
            return Err(Error::Config(
                "split step must contribute at least one user".to_string(),
            ));
        }
        Ok(Self::Split {
            possible_users,
            step: Box::new(step),
            separator: Box::new(separator),
        })
    }

    /// Number of users this profile contributes.
    ///
    /// For the Poisson variant this is the realized count of one full,
    /// seed-deterministic run of the generator, so it is eager.
    pub fn total_users(&self) -> u64 {
        match self {
            Self::AtOnce { users } => *users,
            Self::NothingFor { .. } => 0,
            Self::Ramp { users, .. } => *users,
            Self::ConstantRate { rate, duration } => {
                (rate * duration.as_secs_f64()).round() as u64
            }
            Self::RampRate { start_rate, end_rate, duration } => {
                // Rounded, not floored: the emission path floors each
                // second and rounds the carried leftover into the final
                // second, so one realization holds round(T) users.
                let secs = duration.as_secs() as f64;
                ((start_rate + (end_rate - start_rate) / 2.0) * secs).round() as u64
            }
            Self::Heaviside { users, .. } => *users,
            Self::Poisson { duration, start_rate, end_rate, seed } => {
                if *start_rate == 0.0 && *end_rate == 0.0 {
                    0
                } else {
                    PoissonSchedule::new(*duration, *start_rate, *end_rate, *seed).count() as u64
                }
            }
            Self::Split { possible_users, step, separator } => {
                let step_users = step.total_users();
                if *possible_users < step_users {
                    0
                } else {
                    let pair = step_users + separator.total_users();
                    possible_users - ((possible_users - step_users) % pair)
                }
            }
        }
    }

    /// Timeline span this profile occupies; a chained continuation starts
    /// after it.
    pub fn duration(&self) -> Duration {
        match self {
            Self::AtOnce { .. } => Duration::ZERO,
            Self::NothingFor { duration }
            | Self::Ramp { duration, .. }
            | Self::ConstantRate { duration, .. }
            | Self::RampRate { duration, .. }
            | Self::Heaviside { duration, .. }
            | Self::Poisson { duration, .. } => *duration,
            Self::Split { possible_users, step, separator } => {
                let step_users = step.total_users();
                if *possible_users < step_users {
                    Duration::ZERO
                } else {
                    let pair = step_users + separator.total_users();
                    let reps = (possible_users - step_users) / pair;
                    repeat_duration(step.duration(), reps + 1)
                        + repeat_duration(separator.duration(), reps)
                }
            }
        }
    }

    /// This profile's own offsets, followed by `continuation` with every
    /// offset advanced by this profile's duration.
    ///
    /// The produced sequence is non-decreasing and lazily pulled.
    pub fn schedule(&self, continuation: Schedule) -> Schedule {
        match self {
            Self::AtOnce { users } => burst(*users, continuation),
            Self::NothingFor { duration } => continuation.shifted(*duration),
            Self::Ramp { users, duration } => {
                let seconds = duration.as_secs();
                if *users == 0 {
                    return continuation.shifted(*duration);
                }
                if seconds == 0 {
                    return burst(*users, continuation.shifted(*duration));
                }
                let users = *users;
                let counts: PerSecondCounts =
                    Box::new(move |second| partition_at(users, second, seconds));
                Schedule::new(
                    BucketSchedule::new(seconds, counts)
                        .chain(continuation.shifted(*duration)),
                )
            }
            Self::ConstantRate { rate, duration } => {
                if *rate == 0.0 {
                    return continuation.shifted(*duration);
                }
                Self::ramp(self.total_users(), *duration).schedule(continuation)
            }
            Self::RampRate { start_rate, end_rate, duration } => {
                if *start_rate == 0.0 && *end_rate == 0.0 {
                    return continuation.shifted(*duration);
                }
                let seconds = duration.as_secs();
                if seconds == 0 {
                    return continuation.shifted(*duration);
                }
                let start = *start_rate;
                let slope_half = (*end_rate - start) / (2.0 * seconds as f64);
                let last_second = seconds - 1;
                // Fractional users carry over to the next second so the
                // ramp accrues no systematic rounding bias; the final
                // second absorbs the rounded leftover.
                let mut pending = 0.0_f64;
                let counts: PerSecondCounts = Box::new(move |second| {
                    let raw = slope_half * (2 * second + 1) as f64 + start + pending;
                    let mut count = raw.floor();
                    pending = raw - count;
                    if second == last_second {
                        count += pending.round();
                    }
                    count.max(0.0) as u64
                });
                Schedule::new(
                    BucketSchedule::new(seconds, counts)
                        .chain(continuation.shifted(*duration)),
                )
            }
            Self::Heaviside { users, duration } => {
                if *users == 0 {
                    return continuation.shifted(*duration);
                }
                if duration.is_zero() {
                    return burst(*users, continuation);
                }
                Schedule::new(
                    HeavisideSchedule::new(*users, *duration)
                        .chain(continuation.shifted(*duration)),
                )
            }
            Self::Poisson { duration, start_rate, end_rate, seed } => {
                if *start_rate == 0.0 && *end_rate == 0.0 {
                    return continuation.shifted(*duration);
                }
                Schedule::new(
                    PoissonSchedule::new(*duration, *start_rate, *end_rate, *seed)
                        .chain(continuation.shifted(*duration)),
                )
            }
            Self::Split { possible_users, step, separator } => {
                let step_users = step.total_users();
                if *possible_users < step_users {
                    // Contributes nobody and occupies no timeline
                    return continuation;
                }
                let pair = step_users + separator.total_users();
                let reps = (possible_users - step_users) / pair;
                Schedule::new(SplitSchedule::new(
                    (**step).clone(),
                    (**separator).clone(),
                    reps,
                    continuation,
                ))
            }
        }
    }
}

/// `users` copies of offset zero, then the continuation.
fn burst(users: u64, continuation: Schedule) -> Schedule {
    Schedule::new(iter::repeat(Duration::ZERO).take(users as usize).chain(continuation))
}

/// Sequence a whole plan's profiles into one timeline.
///
/// Built right-to-left so each profile receives its successors as the
/// continuation; chaining is associative, so grouping does not matter.
pub fn chain(profiles: &[InjectionProfile]) -> Schedule {
    let mut schedule = Schedule::empty();
    for profile in profiles.iter().rev() {
        schedule = profile.schedule(schedule);
    }
    schedule
}
