mod chart_point;
mod sale_record;

pub mod period;
pub mod result;
pub mod sales;

pub use chart_point::ChartPoint;
pub use period::{Granularity, PeriodKey};
pub use sale_record::RawSaleRecord;
