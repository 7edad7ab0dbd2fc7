//! Spate Common Library
//!
//! Dependency-light utilities shared across the spate workspace: the
//! even-partition (shard) helper used to spread user counts across time
//! buckets, and the inverse error function backing the smoothed-step
//! arrival profile.

pub mod erf;
pub mod partition;

pub use erf::erfinv;
pub use partition::{partition, partition_at};
