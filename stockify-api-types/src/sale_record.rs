use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed sale as reported by the backend, trimmed down to what the charts read.
///
/// `created_at` stays a raw string: a single bad timestamp should cost one record,
/// not the whole page of sales.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSaleRecord {
    pub created_at: String,
    pub total_amount: f64,
}

impl RawSaleRecord {
    pub fn new(created_at: DateTime<Utc>, total_amount: f64) -> Self {
        Self {
            created_at: created_at.to_rfc3339(),
            total_amount,
        }
    }

    /// Parses `created_at`. Accepts RFC 3339, a naive timestamp (read as UTC) or a bare date.
    pub fn parsed_created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.trim();
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Some(date.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
