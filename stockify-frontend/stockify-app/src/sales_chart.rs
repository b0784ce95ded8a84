use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use stockify_api_types::{sales::SalesQuery, ChartPoint, PeriodKey, RawSaleRecord};
use stockify_charts::{aggregate_sales, fallback_points_random, resolve_period};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    api::{sales_query, SalesDataService},
    config::AppConfig,
    error::AppResult,
    AppError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    /// Synthetic sample data, shown because the fetch failed.
    Fallback,
}

/// What a sales chart is currently showing.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ChartState {
    #[default]
    Idle,
    Loading {
        key: PeriodKey,
        /// Sample series to draw behind the spinner.
        placeholder: Vec<ChartPoint>,
    },
    Loaded {
        key: PeriodKey,
        points: Vec<ChartPoint>,
        source: DataSource,
    },
}

impl ChartState {
    pub fn key(&self) -> Option<PeriodKey> {
        match self {
            ChartState::Idle => None,
            ChartState::Loading { key, .. } | ChartState::Loaded { key, .. } => Some(*key),
        }
    }

    pub fn points(&self) -> &[ChartPoint] {
        match self {
            ChartState::Idle => &[],
            ChartState::Loading { placeholder, .. } => placeholder,
            ChartState::Loaded { points, .. } => points,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ChartState::Loading { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(DataSource),
    /// A newer load started while this one was fetching, so its result was thrown away.
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartOptions {
    pub sales_limit: u32,
    pub fetch_timeout: Option<Duration>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            sales_limit: crate::config::DEFAULT_SALES_LIMIT,
            fetch_timeout: Some(Duration::from_secs(
                crate::config::DEFAULT_FETCH_TIMEOUT_SECS,
            )),
        }
    }
}

impl From<&AppConfig> for ChartOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            sales_limit: config.sales_limit,
            fetch_timeout: config.fetch_timeout,
        }
    }
}

/// One sales chart: runs resolve, fetch and aggregate for a period and publishes the
/// result to whoever renders it.
///
/// Every [`SalesChart::load`] takes a new generation number. When a load finishes after a
/// newer one has started, its data is dropped instead of overwriting the newer state.
pub struct SalesChart<S: SalesDataService + ?Sized> {
    service: Arc<S>,
    options: ChartOptions,
    generation: AtomicU64,
    state: watch::Sender<ChartState>,
}

impl<S: SalesDataService + ?Sized> SalesChart<S> {
    pub fn new(service: Arc<S>, options: ChartOptions) -> Self {
        let (state, _) = watch::channel(ChartState::Idle);
        Self {
            service,
            options,
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ChartState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ChartState {
        self.state.borrow().clone()
    }

    pub async fn load(&self, key: PeriodKey) -> LoadOutcome {
        self.load_at(key, Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn load_at(&self, key: PeriodKey, now: DateTime<Utc>) -> LoadOutcome {
        let window = resolve_period(key, now);
        let placeholder = fallback_points_random(&window);

        // bumped under the channel lock so a finishing load can't slip in between
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = ChartState::Loading { key, placeholder };
        });

        let (points, source) = match self.fetch(sales_query(&window, self.options.sales_limit)).await
        {
            Ok(records) => {
                debug!("aggregating {} sales", records.len());
                (aggregate_sales(&window, &records), DataSource::Live)
            }
            Err(e) => {
                warn!("sales fetch for {key} failed, showing sample data: {e}");
                (fallback_points_random(&window), DataSource::Fallback)
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = ChartState::Loaded {
                key,
                points,
                source,
            };
            true
        });
        if applied {
            LoadOutcome::Applied(source)
        } else {
            info!("discarding stale {key} chart data");
            LoadOutcome::Superseded
        }
    }

    async fn fetch(&self, query: SalesQuery) -> AppResult<Vec<RawSaleRecord>> {
        match self.options.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.service.fetch_sales(query))
                .await
                .unwrap_or(Err(AppError::Timeout(limit))),
            None => self.service.fetch_sales(query).await,
        }
    }
}
