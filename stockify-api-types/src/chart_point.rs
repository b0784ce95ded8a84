use serde::{Deserialize, Serialize};

/// One bucket of a sales chart, already rounded for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Bucket label, e.g. `"Jan 5"` for daily charts or `"Jan"` for monthly ones.
    pub date: String,
    pub sales: u32,
    pub revenue: i64,
    pub profit: i64,
}

impl ChartPoint {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            sales: 0,
            revenue: 0,
            profit: 0,
        }
    }
}
