//! Modification time comparison with a granularity tolerance

use std::time::{Duration, SystemTime};

/// Largest modification time difference still treated as "unchanged".
///
/// Absorbs timestamp granularity differences across volumes and operating
/// systems.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(1);

/// Timestamp comparator
pub struct TimestampComparator;

impl TimestampComparator {
    /// Absolute difference between two timestamps
    #[must_use]
    pub fn difference(a: SystemTime, b: SystemTime) -> Duration {
        match a.duration_since(b) {
            Ok(diff) => diff,
            Err(e) => e.duration(),
        }
    }

    /// Whether two timestamps are within [`MTIME_TOLERANCE`] of each other
    #[must_use]
    pub fn within_tolerance(a: SystemTime, b: SystemTime) -> bool {
        Self::difference(a, b) <= MTIME_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_is_symmetric() {
        let now = SystemTime::now();
        let later = now + Duration::from_secs(5);

        assert_eq!(TimestampComparator::difference(now, later), Duration::from_secs(5));
        assert_eq!(TimestampComparator::difference(later, now), Duration::from_secs(5));
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        let now = SystemTime::now();

        assert!(TimestampComparator::within_tolerance(now, now));
        assert!(TimestampComparator::within_tolerance(now, now + MTIME_TOLERANCE));
        assert!(!TimestampComparator::within_tolerance(
            now,
            now + MTIME_TOLERANCE + Duration::from_millis(1)
        ));
    }
}
