use chrono::TimeZone;
use log::debug;
use stockify_api_types::{ChartPoint, RawSaleRecord};

use crate::{bucket_key, PeriodWindow, SalesBuckets};

/// Share of revenue shown as profit while real cost data is unavailable.
pub const PROFIT_MARGIN: f64 = 0.25;

/// What happened to the records handed to [`SalesBuckets::fold`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoldReport {
    pub matched: usize,
    /// Parsed fine but fell outside every bucket of the window.
    pub out_of_range: usize,
    /// Unparseable `created_at` or a non-finite amount.
    pub malformed: usize,
}

impl<Tz: TimeZone> SalesBuckets<Tz> {
    /// Counts `records` into their buckets. Records that don't belong to any bucket are
    /// skipped; this never fails.
    pub fn fold<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a RawSaleRecord>,
    ) -> FoldReport {
        let mut report = FoldReport::default();
        for record in records {
            let Some(created_at) = record.parsed_created_at() else {
                report.malformed += 1;
                continue;
            };
            if !record.total_amount.is_finite() {
                report.malformed += 1;
                continue;
            }
            let local_date = created_at.with_timezone(&self.timezone).date_naive();
            let key = bucket_key(local_date, self.granularity);
            match self.index.get(&key) {
                Some(&position) => {
                    let bucket = &mut self.buckets[position];
                    bucket.sales_count += 1;
                    bucket.revenue += record.total_amount;
                    report.matched += 1;
                }
                None => report.out_of_range += 1,
            }
        }
        if report.out_of_range > 0 || report.malformed > 0 {
            debug!(
                "dropped {} out of range and {} malformed sale records",
                report.out_of_range, report.malformed
            );
        }
        report
    }

    /// Rounds the accumulated totals for display. Profit is derived from the unrounded
    /// revenue.
    pub fn into_points(self) -> Vec<ChartPoint> {
        self.buckets
            .into_iter()
            .map(|bucket| ChartPoint {
                date: bucket.label,
                sales: bucket.sales_count,
                revenue: bucket.revenue.round() as i64,
                profit: (bucket.revenue * PROFIT_MARGIN).round() as i64,
            })
            .collect()
    }
}

/// Builds the chart series for `window` out of `records` in one go.
pub fn aggregate_sales<Tz: TimeZone>(
    window: &PeriodWindow<Tz>,
    records: &[RawSaleRecord],
) -> Vec<ChartPoint> {
    let mut buckets = SalesBuckets::new(window);
    buckets.fold(records);
    buckets.into_points()
}
