//! Even partitioning of a count into ordered buckets
//!
//! Splitting `total` units across `parts` positions so that every bucket
//! is within one unit of `total / parts` and the remainder is spread
//! across positions instead of piling up at the front. Used to shard a
//! ramp's users across seconds and a second's users across its 1000
//! millisecond slots, so arrivals never cluster on identical timestamps.

/// Size of bucket `index` when `total` is evenly partitioned into `parts`.
///
/// Uses the cumulative-floor rule: bucket `i` holds
/// `floor((i+1)*total/parts) - floor(i*total/parts)` units. Consistent
/// with [`partition`]: `partition(t, p)[i] == partition_at(t, i, p)`.
///
/// # Parameters
/// - `total`: number of units to distribute
/// - `index`: bucket position, must be `< parts`
/// - `parts`: number of buckets, must be `> 0`
#[inline]
pub fn partition_at(total: u64, index: u64, parts: u64) -> u64 {
    debug_assert!(parts > 0, "partition into zero parts");
    debug_assert!(index < parts, "bucket index {index} out of {parts}");
    // Widened so totals near u64::MAX survive the intermediate product
    let total = u128::from(total);
    let index = u128::from(index);
    let parts = u128::from(parts);
    ((total * (index + 1)) / parts - (total * index) / parts) as u64
}

/// Partition `total` into `parts` ordered buckets summing to `total`.
///
/// Every bucket is within 1 of `total / parts`; surplus units land on the
/// positions where the cumulative share crosses an integer boundary, which
/// spreads them evenly across the sequence.
pub fn partition(total: u64, parts: u64) -> Vec<u64> {
    (0..parts).map(|i| partition_at(total, i, parts)).collect()
}
