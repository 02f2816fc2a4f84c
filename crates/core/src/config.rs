use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `PUFFLOG__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Trailing aggregation window, in calendar days ending today.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default)]
    pub taper: TaperConfig,
}

/// Tuning knobs for the taper engine. The thresholds are deliberate
/// defaults, not hard laws; all of them can be overridden per deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct TaperConfig {
    /// Weekly reduction applied when a legacy plan gives no percentage.
    #[serde(default = "default_weekly_pct")]
    pub default_weekly_pct: f64,
    /// 7-day adherence below this percentage triggers easing suggestions.
    #[serde(default = "default_adherence_floor_pct")]
    pub adherence_floor_pct: u32,
    /// This many misses in the 7-day window triggers easing suggestions.
    #[serde(default = "default_miss_limit")]
    pub miss_limit: u32,
    /// Regression slope above this fraction of baseline flags `rising`.
    #[serde(default = "default_rising_slope_frac")]
    pub rising_slope_frac: f64,
    /// Slope above this fraction of baseline flags `strong_rising`.
    #[serde(default = "default_strong_rising_slope_frac")]
    pub strong_rising_slope_frac: f64,
    /// When set, generated targets are snapped to `round_step_g` increments.
    #[serde(default = "default_round_targets")]
    pub round_targets: bool,
    #[serde(default = "default_round_step_g")]
    pub round_step_g: f64,
}

// Default functions
fn default_window_days() -> u32 {
    30
}
fn default_weekly_pct() -> f64 {
    crate::types::DEFAULT_WEEKLY_PCT
}
fn default_adherence_floor_pct() -> u32 {
    70
}
fn default_miss_limit() -> u32 {
    3
}
fn default_rising_slope_frac() -> f64 {
    0.1
}
fn default_strong_rising_slope_frac() -> f64 {
    0.2
}
fn default_round_targets() -> bool {
    false
}
fn default_round_step_g() -> f64 {
    0.05
}

impl Default for TaperConfig {
    fn default() -> Self {
        Self {
            default_weekly_pct: default_weekly_pct(),
            adherence_floor_pct: default_adherence_floor_pct(),
            miss_limit: default_miss_limit(),
            rising_slope_frac: default_rising_slope_frac(),
            strong_rising_slope_frac: default_strong_rising_slope_frac(),
            round_targets: default_round_targets(),
            round_step_g: default_round_step_g(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            taper: TaperConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("PUFFLOG")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.window_days, 30);
        assert_eq!(cfg.taper.default_weekly_pct, 0.2);
        assert_eq!(cfg.taper.adherence_floor_pct, 70);
        assert_eq!(cfg.taper.miss_limit, 3);
        assert!(!cfg.taper.round_targets);
        assert_eq!(cfg.taper.round_step_g, 0.05);
    }
}
