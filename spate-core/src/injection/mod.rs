//! Injection profiles and arrival schedules
//!
//! A profile is a declarative arrival policy (how many users, at which
//! offsets); a schedule is the lazily produced, non-decreasing sequence
//! of millisecond offsets realized from it. Profiles compose: each one
//! appends a continuation schedule shifted by its own duration, which is
//! how independent steps are sequenced into a single run timeline.

mod buckets;
mod heaviside;
mod poisson;
mod profile;
mod schedule;
mod split;

pub use profile::{chain, InjectionProfile};
pub use schedule::Schedule;
