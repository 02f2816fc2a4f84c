//! Trend analysis — short-window statistical signals over daily totals,
//! used to detect rising consumption.

use serde::{Deserialize, Serialize};

use pufflog_core::types::round_dp;

/// How many trailing values the trend flags consider.
const TREND_WINDOW: usize = 7;

/// Slope thresholds as fractions of baseline, per unit index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendThresholds {
    pub rising: f64,
    pub strong_rising: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            rising: 0.1,
            strong_rising: 0.2,
        }
    }
}

/// Outcome of the trend evaluation over the last 7 values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    /// OLS slope over the trailing window, grams per day.
    pub slope: f64,
    pub rising: bool,
    pub strong_rising: bool,
}

/// Trailing mean over up to `window` values for every index. Partial
/// windows at the start use whatever points exist; output length always
/// equals input length. 3-decimal rounded.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        let avg = slice.iter().sum::<f64>() / slice.len() as f64;
        out.push(round_dp(avg, 3));
    }
    out
}

/// Standard exponential moving average seeded with the first value,
/// 3-decimal rounded at each step.
pub fn ema(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values.first().copied().unwrap_or(0.0);
    for &v in values {
        let e = alpha * v + (1.0 - alpha) * prev;
        out.push(round_dp(e, 3));
        prev = e;
    }
    out
}

/// Ordinary least-squares slope of value over 0-based index, in units per
/// day. Returns 0 for fewer than two points or a degenerate design
/// matrix. 4-decimal rounded.
pub fn linear_regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &v) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += v;
        sum_xy += x * v;
        sum_xx += x * x;
    }
    let n = n as f64;
    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    round_dp(numerator / denominator, 4)
}

/// Evaluate the trend flags over the last 7 values: `rising` when the
/// slope exceeds `thresholds.rising` of baseline per unit index,
/// `strong_rising` when it exceeds `thresholds.strong_rising`.
pub fn trend_flags(values: &[f64], baseline_g: f64, thresholds: TrendThresholds) -> TrendSignal {
    let start = values.len().saturating_sub(TREND_WINDOW);
    let slope = linear_regression_slope(&values[start..]);
    TrendSignal {
        slope,
        rising: slope > thresholds.rising * baseline_g,
        strong_rising: slope > thresholds.strong_rising * baseline_g,
    }
}
