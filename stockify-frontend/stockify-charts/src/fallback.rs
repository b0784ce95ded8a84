use std::ops::Range;

use chrono::TimeZone;
use rand::Rng;
use stockify_api_types::ChartPoint;

use crate::{bucket_dates, bucket_label, PeriodWindow};

pub const FALLBACK_SALES: Range<u32> = 5..55;
pub const FALLBACK_REVENUE: Range<i64> = 10_000..60_000;

/// Synthetic series with the same buckets as a real chart for `window`, so a chart is
/// never rendered blank while data is missing.
///
/// Profit lands between 20% and 50% of revenue.
pub fn fallback_points<Tz, R>(window: &PeriodWindow<Tz>, rng: &mut R) -> Vec<ChartPoint>
where
    Tz: TimeZone,
    R: Rng + ?Sized,
{
    bucket_dates(window)
        .into_iter()
        .map(|date| {
            let revenue = rng.gen_range(FALLBACK_REVENUE);
            // integer bounds so rounding can't push profit under a fifth of revenue
            let min_profit = (revenue + 4) / 5;
            let max_profit = revenue / 2;
            ChartPoint {
                date: bucket_label(date, window.granularity),
                sales: rng.gen_range(FALLBACK_SALES),
                revenue,
                profit: rng.gen_range(min_profit..=max_profit),
            }
        })
        .collect()
}

pub fn fallback_points_random<Tz: TimeZone>(window: &PeriodWindow<Tz>) -> Vec<ChartPoint> {
    fallback_points(window, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolve_period, SalesBuckets};
    use chrono::Utc;
    use rand::{rngs::StdRng, SeedableRng};
    use stockify_api_types::PeriodKey;

    #[test]
    fn values_stay_in_range() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 23, 0, 0).unwrap();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for key in PeriodKey::ALL {
                let points = fallback_points(&resolve_period(key, now), &mut rng);
                assert_eq!(points.len(), key.bucket_count() as usize);
                for point in points {
                    assert!(FALLBACK_SALES.contains(&point.sales));
                    assert!(FALLBACK_REVENUE.contains(&point.revenue));
                    assert!(point.profit <= point.revenue);
                    assert!(point.profit as f64 >= 0.2 * point.revenue as f64);
                }
            }
        }
    }

    #[test]
    fn labels_match_real_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 23, 0, 0).unwrap();
        for key in PeriodKey::ALL {
            let window = resolve_period(key, now);
            let expected: Vec<_> = SalesBuckets::new(&window)
                .into_points()
                .into_iter()
                .map(|p| p.date)
                .collect();
            let labels: Vec<_> = fallback_points_random(&window)
                .into_iter()
                .map(|p| p.date)
                .collect();
            assert_eq!(labels, expected);
        }
    }
}
