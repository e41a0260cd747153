use chrono::{DateTime, Duration, Utc};

/// Cache freshness policy.
///
/// A snapshot is fresh for seven days from its timestamp, exclusive: a
/// snapshot exactly at the age limit is already stale. Pure and stateless;
/// both `load` and `validate_cache` defer to this single rule, so the two
/// can never disagree about freshness.
pub struct CachePolicy;

impl CachePolicy {
    const MAX_AGE_DAYS: i64 = 7;

    /// Returns true when a snapshot stamped `timestamp` is still fresh at `now`.
    pub fn validate(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now < timestamp + Duration::days(Self::MAX_AGE_DAYS)
    }
}
