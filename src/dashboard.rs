use tracing::{info, warn};

use crate::chart::{price_series, ChartPoint};
use crate::client::AnalysisClient;
use crate::config::{clamp_years, Config, MAX_YEARS_FORWARD, MIN_YEARS_FORWARD};
use crate::error::{AppError, Result};
use crate::types::{AnalysisRequest, AnalysisResponse, Summary, TableRow};

/// Which input field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Ticker,
    Years,
}

/// A request that has passed the trigger checks and is ready to send.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub client: AnalysisClient,
    pub request: AnalysisRequest,
}

/// What came back for a [`PendingAnalysis`].
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub years_forward: u32,
    pub result: Result<AnalysisResponse>,
}

impl PendingAnalysis {
    pub async fn run(self) -> AnalysisOutcome {
        let result = self.client.analyze(&self.request).await;
        AnalysisOutcome { years_forward: self.request.years_forward, result }
    }
}

/// Inputs, loading flag, error banner and the three result slots of the
/// valuation dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub ticker: String,
    pub years_forward: u32,
    pub focus: Focus,
    pub loading: bool,
    pub error: Option<String>,
    pub summary: Option<Summary>,
    pub hist: Vec<TableRow>,
    pub forecast: Vec<TableRow>,
    /// Horizon of the request that produced the displayed results.
    pub analyzed_years: u32,
    client: Option<AnalysisClient>,
}

impl Dashboard {
    pub fn new(client: Option<AnalysisClient>, ticker: &str, years_forward: u32) -> Self {
        let years_forward = clamp_years(years_forward);
        Self {
            ticker: ticker.to_uppercase(),
            years_forward,
            focus: Focus::Ticker,
            loading: false,
            error: None,
            summary: None,
            hist: Vec::new(),
            forecast: Vec::new(),
            analyzed_years: years_forward,
            client,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let client = AnalysisClient::from_config(cfg)?;
        Ok(Self::new(client, &cfg.default_ticker, cfg.default_years_forward))
    }

    // -----------------------------------------------------------------------
    // Input editing
    // -----------------------------------------------------------------------

    pub fn set_ticker(&mut self, ticker: &str) {
        self.ticker = ticker.to_uppercase();
    }

    pub fn push_ticker_char(&mut self, c: char) {
        self.ticker.extend(c.to_uppercase());
    }

    pub fn pop_ticker_char(&mut self) {
        self.ticker.pop();
    }

    pub fn set_years_forward(&mut self, years: u32) {
        self.years_forward = clamp_years(years);
    }

    pub fn increment_years(&mut self) {
        self.years_forward = (self.years_forward + 1).min(MAX_YEARS_FORWARD);
    }

    pub fn decrement_years(&mut self) {
        self.years_forward = self.years_forward.saturating_sub(1).max(MIN_YEARS_FORWARD);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Ticker => Focus::Years,
            Focus::Years => Focus::Ticker,
        };
    }

    // -----------------------------------------------------------------------
    // Analyze cycle
    // -----------------------------------------------------------------------

    /// Trigger-path checks. Returns the request to send, or `None` when a
    /// request is already in flight or no service is configured (the latter
    /// sets the error banner).
    pub fn begin_analyze(&mut self) -> Option<PendingAnalysis> {
        if self.loading {
            return None;
        }
        let Some(client) = self.client.clone() else {
            warn!("analyze requested but ANALYSIS_API_URL is not set");
            self.error = Some(AppError::MissingApiUrl.to_string());
            return None;
        };

        self.loading = true;
        self.error = None;
        let request = AnalysisRequest::new(&self.ticker, self.years_forward);
        info!(ticker = %request.ticker, years_forward = request.years_forward, "analyze");
        Some(PendingAnalysis { client, request })
    }

    /// Apply a finished request. Results are only replaced on success.
    pub fn finish_analyze(&mut self, outcome: AnalysisOutcome) {
        match outcome.result {
            Ok(resp) => {
                info!(
                    ticker = %resp.summary.ticker,
                    hist_rows = resp.hist_table.len(),
                    forecast_rows = resp.forecast_table.len(),
                    "analysis received"
                );
                self.summary = Some(resp.summary);
                self.hist = resp.hist_table;
                self.forecast = resp.forecast_table;
                self.analyzed_years = outcome.years_forward;
            }
            Err(e) => {
                warn!("analysis failed: {e}");
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Full analyze cycle in place.
    pub async fn analyze(&mut self) {
        if let Some(pending) = self.begin_analyze() {
            let outcome = pending.run().await;
            self.finish_analyze(outcome);
        }
    }

    /// Mid-case price path, empty until a summary and forecast rows are present.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        match &self.summary {
            Some(summary) if !self.forecast.is_empty() => price_series(summary, self.analyzed_years),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> AnalysisResponse {
        serde_json::from_value(json!({
            "summary": {
                "ticker": "NOW",
                "name": "ServiceNow",
                "current_price": 100.0,
                "target_price_mid": 150.0,
                "total_return_mid": 0.5,
                "annualized_mid": 0.1067
            },
            "hist_table": [{ "Metric": "Revenue", "1 Year": 0.22 }],
            "forecast_table": [{ "Scenario": "Mid", "Total Return": 0.5 }]
        }))
        .unwrap()
    }

    fn configured() -> Dashboard {
        let client = AnalysisClient::new("http://127.0.0.1:9", None).unwrap();
        Dashboard::new(Some(client), "now", 4)
    }

    #[test]
    fn missing_api_url_sets_error_without_request() {
        let mut dash = Dashboard::new(None, "NOW", 4);
        assert!(dash.begin_analyze().is_none());
        assert_eq!(dash.error.as_deref(), Some("API URL not configured"));
        assert!(!dash.loading);
    }

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let mut dash = configured();
        dash.error = Some("old".to_string());
        let pending = dash.begin_analyze().unwrap();
        assert!(dash.loading);
        assert!(dash.error.is_none());
        assert_eq!(pending.request.ticker, "NOW");
        assert_eq!(pending.request.years_forward, 4);
    }

    #[test]
    fn second_trigger_while_loading_is_ignored() {
        let mut dash = configured();
        assert!(dash.begin_analyze().is_some());
        assert!(dash.begin_analyze().is_none());
        assert!(dash.loading);
    }

    #[test]
    fn success_replaces_result_slots() {
        let mut dash = configured();
        dash.set_years_forward(6);
        let pending = dash.begin_analyze().unwrap();
        dash.set_years_forward(9);
        dash.finish_analyze(AnalysisOutcome {
            years_forward: pending.request.years_forward,
            result: Ok(response()),
        });
        assert!(!dash.loading);
        assert_eq!(dash.summary.as_ref().unwrap().target_price_mid, 150.0);
        assert_eq!(dash.hist.len(), 1);
        assert_eq!(dash.forecast.len(), 1);
        // The chart follows the analyzed horizon, not the edited input.
        assert_eq!(dash.chart_points().len(), 7);
    }

    #[test]
    fn failure_keeps_prior_results() {
        let mut dash = configured();
        dash.begin_analyze();
        dash.finish_analyze(AnalysisOutcome { years_forward: 4, result: Ok(response()) });

        dash.begin_analyze();
        dash.finish_analyze(AnalysisOutcome {
            years_forward: 4,
            result: Err(AppError::Status(502)),
        });
        assert!(!dash.loading);
        assert_eq!(dash.error.as_deref(), Some("API error 502"));
        assert_eq!(dash.summary.as_ref().unwrap().ticker, "NOW");
        assert_eq!(dash.hist.len(), 1);
    }

    #[test]
    fn chart_is_empty_without_forecast_rows() {
        let mut dash = configured();
        let mut resp = response();
        resp.forecast_table.clear();
        dash.finish_analyze(AnalysisOutcome { years_forward: 4, result: Ok(resp) });
        assert!(dash.chart_points().is_empty());
    }

    #[test]
    fn input_editing_uppercases_and_clamps() {
        let mut dash = Dashboard::new(None, "", 4);
        dash.push_ticker_char('m');
        dash.push_ticker_char('s');
        assert_eq!(dash.ticker, "MS");
        dash.pop_ticker_char();
        assert_eq!(dash.ticker, "M");
        dash.set_ticker("aapl");
        assert_eq!(dash.ticker, "AAPL");

        dash.set_years_forward(1);
        assert_eq!(dash.years_forward, 3);
        dash.decrement_years();
        assert_eq!(dash.years_forward, 3);
        dash.set_years_forward(10);
        dash.increment_years();
        assert_eq!(dash.years_forward, 10);
    }

    #[test]
    fn focus_toggles() {
        let mut dash = Dashboard::new(None, "NOW", 4);
        assert_eq!(dash.focus, Focus::Ticker);
        dash.toggle_focus();
        assert_eq!(dash.focus, Focus::Years);
        dash.toggle_focus();
        assert_eq!(dash.focus, Focus::Ticker);
    }
}
