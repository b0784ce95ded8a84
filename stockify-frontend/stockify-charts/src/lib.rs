//! Sales chart shaping for the dashboard.
//!
//! A chart is built in four steps: [`resolve_period`] turns a [`PeriodKey`] into a
//! concrete window, [`SalesBuckets::new`] lays out the zero-filled buckets for it,
//! [`SalesBuckets::fold`] counts the raw sales into them and
//! [`SalesBuckets::into_points`] rounds the result for display. When there is no real
//! data to fold, [`fallback_points`] produces a plausible synthetic series of the same
//! shape instead.

mod aggregate;
mod buckets;
mod fallback;
mod period;
mod summary;

pub use aggregate::{aggregate_sales, FoldReport, PROFIT_MARGIN};
pub use buckets::{bucket_dates, bucket_key, bucket_label, Bucket, SalesBuckets};
pub use fallback::{fallback_points, fallback_points_random, FALLBACK_REVENUE, FALLBACK_SALES};
pub use period::{resolve_period, PeriodWindow};
pub use summary::SalesSummary;

pub use stockify_api_types::{ChartPoint, Granularity, PeriodKey, RawSaleRecord};
