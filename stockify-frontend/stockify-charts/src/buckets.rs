use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate, TimeZone};
use stockify_api_types::Granularity;

use crate::PeriodWindow;

/// Date of the first day covered by the bucket `date` falls into.
pub fn bucket_key(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date,
        Granularity::Monthly => date.with_day(1).unwrap_or(date),
    }
}

/// Display label for a bucket: `"Jan 5"` for days, `"Jan"` for months.
pub fn bucket_label(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format("%b %-d").to_string(),
        Granularity::Monthly => date.format("%b").to_string(),
    }
}

/// Keys of every bucket in `window`, earliest first and ending with the bucket holding
/// `window.end`.
pub fn bucket_dates<Tz: TimeZone>(window: &PeriodWindow<Tz>) -> Vec<NaiveDate> {
    let last = bucket_key(window.end.date_naive(), window.granularity);
    (0..window.buckets)
        .rev()
        .filter_map(|steps_back| match window.granularity {
            Granularity::Daily => last.checked_sub_days(Days::new(steps_back.into())),
            Granularity::Monthly => last.checked_sub_months(Months::new(steps_back)),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bucket {
    pub key: NaiveDate,
    pub label: String,
    pub sales_count: u32,
    /// Unrounded sum of `total_amount`. Rounded only when turned into a chart point.
    pub revenue: f64,
}

impl Bucket {
    fn empty(key: NaiveDate, granularity: Granularity) -> Self {
        Self {
            key,
            label: bucket_label(key, granularity),
            sales_count: 0,
            revenue: 0.0,
        }
    }
}

/// Zero-filled, ordered buckets for one chart run.
///
/// Buckets are looked up by the date they start on rather than by label, so a record from
/// last March can never be counted into this March's `"Mar"` bucket.
#[derive(Clone, Debug)]
pub struct SalesBuckets<Tz: TimeZone> {
    pub(crate) granularity: Granularity,
    pub(crate) timezone: Tz,
    pub(crate) buckets: Vec<Bucket>,
    pub(crate) index: HashMap<NaiveDate, usize>,
}

impl<Tz: TimeZone> SalesBuckets<Tz> {
    pub fn new(window: &PeriodWindow<Tz>) -> Self {
        let buckets: Vec<_> = bucket_dates(window)
            .into_iter()
            .map(|key| Bucket::empty(key, window.granularity))
            .collect();
        let index = buckets
            .iter()
            .enumerate()
            .map(|(position, bucket)| (bucket.key, position))
            .collect();
        Self {
            granularity: window.granularity,
            timezone: window.timezone(),
            buckets,
            index,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: NaiveDate) -> Option<&Bucket> {
        self.index.get(&key).map(|position| &self.buckets[*position])
    }
}
