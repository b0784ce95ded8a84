use chrono::{DateTime, Duration, Months, TimeZone};
use stockify_api_types::{Granularity, PeriodKey};

/// A period key pinned to concrete dates.
#[derive(Clone, Debug)]
pub struct PeriodWindow<Tz: TimeZone> {
    pub key: PeriodKey,
    /// Number of buckets, which are months rather than days for [`Granularity::Monthly`].
    pub buckets: u32,
    pub granularity: Granularity,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> PeriodWindow<Tz> {
    pub fn timezone(&self) -> Tz {
        self.end.timezone()
    }
}

/// Resolves `key` into a window ending at `now`.
///
/// Daily periods start `bucket_count` days before `now`. The yearly period steps back
/// twelve calendar months, so the day is clamped at month end (Feb 29 becomes Feb 28).
pub fn resolve_period<Tz: TimeZone>(key: PeriodKey, now: DateTime<Tz>) -> PeriodWindow<Tz> {
    let granularity = key.granularity();
    let start = match granularity {
        Granularity::Daily => now.clone() - Duration::days(key.bucket_count().into()),
        // only fails for local times that fall into a DST gap a year back
        Granularity::Monthly => now
            .clone()
            .checked_sub_months(Months::new(12))
            .unwrap_or_else(|| now.clone() - Duration::days(365)),
    };
    PeriodWindow {
        key,
        buckets: key.bucket_count(),
        granularity,
        start,
        end: now,
    }
}
