use stockify_api_types::ChartPoint;

/// Totals shown on the dashboard cards next to a chart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SalesSummary {
    pub total_sales: u64,
    pub total_revenue: i64,
    pub total_profit: i64,
    /// Revenue per sale, rounded. Zero when nothing sold.
    pub average_order_value: i64,
    /// Bucket with the highest revenue, the latest one on ties.
    pub peak: Option<ChartPoint>,
}

impl SalesSummary {
    pub fn from_points(points: &[ChartPoint]) -> Self {
        let total_sales: u64 = points.iter().map(|p| u64::from(p.sales)).sum();
        let total_revenue: i64 = points.iter().map(|p| p.revenue).sum();
        let total_profit: i64 = points.iter().map(|p| p.profit).sum();
        let average_order_value = if total_sales == 0 {
            0
        } else {
            (total_revenue as f64 / total_sales as f64).round() as i64
        };
        let peak = points
            .iter()
            .filter(|p| p.revenue > 0)
            .max_by_key(|p| p.revenue)
            .cloned();
        SalesSummary {
            total_sales,
            total_revenue,
            total_profit,
            average_order_value,
            peak,
        }
    }
}
