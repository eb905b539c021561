//! Freshness policy for cached snapshots
//!
//! A pure decision function with no state and no I/O; safe to call from any
//! task without synchronization.

use chrono::{DateTime, Days, Utc};

/// Number of calendar days a cached snapshot stays servable
const MAX_CACHE_AGE_DAYS: u64 = 7;

/// Decides whether a snapshot written at `timestamp` is still fresh at `now`
///
/// The expiry boundary is `timestamp` plus seven calendar days; the boundary
/// itself is already expired. If the day arithmetic is undefined for the given
/// date the snapshot is treated as invalid: unverifiable data is never served.
pub fn is_valid(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match timestamp.checked_add_days(Days::new(MAX_CACHE_AGE_DAYS)) {
        Some(expiry) => now < expiry,
        None => false,
    }
}
