use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use stockify_api_types::{ChartPoint, PeriodKey};
use stockify_app::{
    AppConfig, ChartOptions, Dashboard, DashboardPanel, DataSource, FileThemeStorage,
    HttpSalesService, SystemPreference, ThemeSettings,
};
use tracing::{info, warn};

#[derive(Serialize)]
struct PanelReport {
    period: PeriodKey,
    source: Option<DataSource>,
    total_sales: u64,
    total_revenue: i64,
    total_profit: i64,
    average_order_value: i64,
    peak: Option<String>,
    points: Vec<ChartPoint>,
}

impl From<DashboardPanel> for PanelReport {
    fn from(panel: DashboardPanel) -> Self {
        PanelReport {
            period: panel.key,
            source: panel.source,
            total_sales: panel.summary.total_sales,
            total_revenue: panel.summary.total_revenue,
            total_profit: panel.summary.total_profit,
            average_order_value: panel.summary.average_order_value,
            peak: panel.summary.peak.map(|p| p.date),
            points: panel.points,
        }
    }
}

#[derive(Serialize)]
struct DashboardReport {
    theme: &'static str,
    palette: &'static str,
    panels: Vec<PanelReport>,
}

/// Period keys given on the command line, all of them when none are.
fn requested_periods() -> Result<Vec<PeriodKey>> {
    let periods = std::env::args()
        .skip(1)
        .map(|arg| arg.parse::<PeriodKey>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(if periods.is_empty() {
        PeriodKey::ALL.to_vec()
    } else {
        periods
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = AppConfig::from_env().context("reading configuration")?;
    let periods = requested_periods()?;
    info!("using sales API at {}", config.api_url);

    let theme = ThemeSettings::new(
        Arc::new(FileThemeStorage::new(&config.theme_file)),
        SystemPreference::Dark,
    );
    let attributes = theme.attributes();

    let service = Arc::new(HttpSalesService::new(&config)?);
    let dashboard = Dashboard::with_periods(service, ChartOptions::from(&config), &periods);
    let panels = dashboard.load_all(Utc::now()).await;
    if panels
        .iter()
        .any(|panel| panel.source == Some(DataSource::Fallback))
    {
        warn!("some charts are showing sample data, the sales API could not be reached");
    }

    let report = DashboardReport {
        theme: attributes.data_theme,
        palette: attributes.data_palette,
        panels: panels.into_iter().map(PanelReport::from).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
