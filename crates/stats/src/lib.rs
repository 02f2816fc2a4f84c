//! Usage statistics — daily aggregation, baseline estimation, trend
//! analysis, and window summaries over the raw consumption log.

pub mod aggregate;
pub mod baseline;
pub mod summary;
pub mod trend;

pub use aggregate::aggregate_daily_totals;
pub use baseline::compute_baseline;
pub use summary::{summarize_usage, UsageSummary};
pub use trend::{ema, linear_regression_slope, rolling_mean, trend_flags, TrendSignal, TrendThresholds};
