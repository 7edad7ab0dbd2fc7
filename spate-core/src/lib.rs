//! Spate Core Library
//!
//! This crate is the arrival-schedule generator at the heart of the spate
//! load-injection engine. Under an open workload model, virtual users
//! arrive according to declarative injection profiles regardless of
//! whether earlier users have finished; this crate turns those profiles
//! into lazily produced, non-decreasing sequences of millisecond offsets,
//! one per user, for the dispatcher to launch against.
//!
//! Executing the injected work, transports, and metrics live elsewhere;
//! this crate is pure computation plus the private seeded randomness of
//! Poisson profiles.

pub mod config;
pub mod error;
pub mod injection;
pub mod seed;

pub use error::{Error, Result};
pub use injection::{chain, InjectionProfile, Schedule};
