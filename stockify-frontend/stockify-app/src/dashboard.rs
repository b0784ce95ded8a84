use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use itertools::Itertools;
use stockify_api_types::{ChartPoint, PeriodKey};
use stockify_charts::SalesSummary;
use tracing::{info, instrument};

use crate::{
    api::SalesDataService,
    sales_chart::{ChartOptions, ChartState, DataSource, SalesChart},
};

/// One chart on the dashboard together with its summary cards.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardPanel {
    pub key: PeriodKey,
    /// `None` while the chart has not finished loading.
    pub source: Option<DataSource>,
    pub points: Vec<ChartPoint>,
    pub summary: SalesSummary,
}

impl DashboardPanel {
    fn from_state(key: PeriodKey, state: &ChartState) -> Self {
        let source = match state {
            ChartState::Loaded { source, .. } => Some(*source),
            _ => None,
        };
        let points = state.points().to_vec();
        DashboardPanel {
            key,
            source,
            summary: SalesSummary::from_points(&points),
            points,
        }
    }
}

/// A sales chart per period, each with its own state, sharing one data service.
pub struct Dashboard<S: SalesDataService + ?Sized> {
    charts: Vec<(PeriodKey, SalesChart<S>)>,
}

impl<S: SalesDataService + ?Sized> Dashboard<S> {
    pub fn new(service: Arc<S>, options: ChartOptions) -> Self {
        Self::with_periods(service, options, &PeriodKey::ALL)
    }

    pub fn with_periods(service: Arc<S>, options: ChartOptions, periods: &[PeriodKey]) -> Self {
        let charts = periods
            .iter()
            .unique()
            .map(|key| (*key, SalesChart::new(service.clone(), options)))
            .collect();
        Self { charts }
    }

    pub fn chart(&self, key: PeriodKey) -> Option<&SalesChart<S>> {
        self.charts
            .iter()
            .find(|(chart_key, _)| *chart_key == key)
            .map(|(_, chart)| chart)
    }

    #[instrument(skip(self))]
    pub async fn load_all(&self, now: DateTime<Utc>) -> Vec<DashboardPanel> {
        info!(
            "loading dashboard charts: {}",
            self.charts.iter().map(|(key, _)| key).join(", ")
        );
        join_all(
            self.charts
                .iter()
                .map(|(key, chart)| chart.load_at(*key, now)),
        )
        .await;
        self.charts
            .iter()
            .map(|(key, chart)| DashboardPanel::from_state(*key, &chart.state()))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::AppResult;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use stockify_api_types::{sales::SalesQuery, RawSaleRecord};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    /// Answers with every record inside the requested range, like the real backend.
    struct RangeSales(Vec<RawSaleRecord>);

    #[async_trait]
    impl SalesDataService for RangeSales {
        async fn fetch_sales(&self, query: SalesQuery) -> AppResult<Vec<RawSaleRecord>> {
            Ok(self
                .0
                .iter()
                .filter(|r| {
                    let at = r.parsed_created_at().unwrap();
                    at >= query.start_date && at <= query.end_date
                })
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn loads_every_period() {
        let records = vec![
            RawSaleRecord::new(now() - Duration::days(1), 200.0),
            RawSaleRecord::new(now() - Duration::days(10), 300.0),
            RawSaleRecord::new(now() - Duration::days(100), 500.0),
        ];
        let dashboard = Dashboard::new(Arc::new(RangeSales(records)), ChartOptions::default());
        let panels = dashboard.load_all(now()).await;

        let keys: Vec<_> = panels.iter().map(|p| p.key).collect();
        assert_eq!(keys, PeriodKey::ALL.to_vec());
        assert!(panels.iter().all(|p| p.source == Some(DataSource::Live)));

        let totals: Vec<_> = panels
            .iter()
            .map(|p| (p.points.len(), p.summary.total_sales, p.summary.total_revenue))
            .collect();
        assert_eq!(totals, vec![(7, 1, 200), (30, 2, 500), (12, 3, 1000)]);
        assert_eq!(panels[2].summary.total_profit, 250);
    }

    #[tokio::test]
    async fn charts_are_independent() {
        let dashboard = Dashboard::with_periods(
            Arc::new(RangeSales(vec![])),
            ChartOptions::default(),
            &[PeriodKey::OneYear, PeriodKey::OneYear, PeriodKey::SevenDays],
        );
        assert!(dashboard.chart(PeriodKey::ThirtyDays).is_none());

        dashboard
            .chart(PeriodKey::SevenDays)
            .unwrap()
            .load_at(PeriodKey::SevenDays, now())
            .await;
        assert_eq!(
            dashboard.chart(PeriodKey::OneYear).unwrap().state(),
            ChartState::Idle
        );
        assert_eq!(
            dashboard.chart(PeriodKey::SevenDays).unwrap().state().points().len(),
            7
        );
    }
}
