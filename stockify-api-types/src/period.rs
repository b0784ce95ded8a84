use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The period selector shown above every sales chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKey {
    #[default]
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "1y")]
    OneYear,
}

/// Whether one bucket covers a day or a month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period '{0}', expected one of 7d, 30d, 1y")]
pub struct UnknownPeriodKey(pub String);

impl PeriodKey {
    pub const ALL: [PeriodKey; 3] = [
        PeriodKey::SevenDays,
        PeriodKey::ThirtyDays,
        PeriodKey::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKey::SevenDays => "7d",
            PeriodKey::ThirtyDays => "30d",
            PeriodKey::OneYear => "1y",
        }
    }

    /// Number of buckets a chart for this period shows. For `1y` these are months, not days.
    pub fn bucket_count(&self) -> u32 {
        match self {
            PeriodKey::SevenDays => 7,
            PeriodKey::ThirtyDays => 30,
            PeriodKey::OneYear => 12,
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            PeriodKey::SevenDays | PeriodKey::ThirtyDays => Granularity::Daily,
            PeriodKey::OneYear => Granularity::Monthly,
        }
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKey {
    type Err = UnknownPeriodKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(PeriodKey::SevenDays),
            "30d" => Ok(PeriodKey::ThirtyDays),
            "1y" => Ok(PeriodKey::OneYear),
            other => Err(UnknownPeriodKey(other.to_string())),
        }
    }
}
