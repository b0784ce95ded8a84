pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod global_state;
pub mod sales_chart;

pub use api::{HttpSalesService, SalesDataService};
pub use config::AppConfig;
pub use dashboard::{Dashboard, DashboardPanel};
pub use error::{AppError, AppResult};
pub use global_state::theme::{
    FileThemeStorage, MemoryThemeStorage, SystemPreference, ThemeSettings,
};
pub use sales_chart::{ChartOptions, ChartState, DataSource, LoadOutcome, SalesChart};
