use crate::error::{AppError, Result};

/// Shortest forecast horizon the analysis service accepts (years).
pub const MIN_YEARS_FORWARD: u32 = 3;

/// Longest forecast horizon the analysis service accepts (years).
pub const MAX_YEARS_FORWARD: u32 = 10;

pub const DEFAULT_TICKER: &str = "NOW";
pub const DEFAULT_YEARS_FORWARD: u32 = 4;

/// Channel capacity for analysis outcomes delivered to the TUI loop.
pub const CHANNEL_CAPACITY: usize = 16;

/// TUI redraw / input poll interval (milliseconds).
pub const TICK_RATE_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the analysis service (ANALYSIS_API_URL). Unset or empty
    /// is reported to the user when they try to analyze, not at startup.
    pub api_url: Option<String>,
    pub log_level: String,
    /// Log destination for the TUI, which owns the terminal (LOG_FILE)
    pub log_file: String,
    /// Per-request timeout; no timeout when unset (REQUEST_TIMEOUT_SECS)
    pub request_timeout_secs: Option<u64>,
    pub default_ticker: String,
    pub default_years_forward: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config("REQUEST_TIMEOUT_SECS must be a whole number of seconds".to_string())
            })?),
            _ => None,
        };

        let default_years_forward = match lookup("DEFAULT_YEARS_FORWARD") {
            Some(raw) if !raw.trim().is_empty() => clamp_years(raw.trim().parse::<u32>().map_err(|_| {
                AppError::Config("DEFAULT_YEARS_FORWARD must be a whole number of years".to_string())
            })?),
            _ => DEFAULT_YEARS_FORWARD,
        };

        Ok(Self {
            api_url: lookup("ANALYSIS_API_URL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_file: lookup("LOG_FILE").unwrap_or_else(|| "dashboard.log".to_string()),
            request_timeout_secs,
            default_ticker: lookup("DEFAULT_TICKER")
                .unwrap_or_else(|| DEFAULT_TICKER.to_string())
                .to_uppercase(),
            default_years_forward,
        })
    }
}

/// Pin a horizon into the range the analysis service accepts.
pub fn clamp_years(years: u32) -> u32 {
    years.clamp(MIN_YEARS_FORWARD, MAX_YEARS_FORWARD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.api_url.is_none());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_file, "dashboard.log");
        assert!(cfg.request_timeout_secs.is_none());
        assert_eq!(cfg.default_ticker, "NOW");
        assert_eq!(cfg.default_years_forward, 4);
    }

    #[test]
    fn empty_api_url_counts_as_missing() {
        let cfg = config(&[("ANALYSIS_API_URL", "  ")]).unwrap();
        assert!(cfg.api_url.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("ANALYSIS_API_URL", "https://analysis.example.com"),
            ("REQUEST_TIMEOUT_SECS", "15"),
            ("DEFAULT_TICKER", "msft"),
            ("DEFAULT_YEARS_FORWARD", "12"),
        ])
        .unwrap();
        assert_eq!(cfg.api_url.as_deref(), Some("https://analysis.example.com"));
        assert_eq!(cfg.request_timeout_secs, Some(15));
        assert_eq!(cfg.default_ticker, "MSFT");
        assert_eq!(cfg.default_years_forward, MAX_YEARS_FORWARD);
    }

    #[test]
    fn rejects_unparsable_timeout() {
        let err = config(&[("REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn clamp_years_holds_range() {
        assert_eq!(clamp_years(0), 3);
        assert_eq!(clamp_years(7), 7);
        assert_eq!(clamp_years(99), 10);
    }
}
