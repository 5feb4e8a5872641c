use serde::{Deserialize, Serialize};

use crate::config::clamp_years;

// ---------------------------------------------------------------------------
// Request side
// ---------------------------------------------------------------------------

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub years_forward: u32,
    #[serde(flatten)]
    pub assumptions: Assumptions,
}

impl AnalysisRequest {
    /// Uppercases the ticker and pins the horizon into the accepted range.
    pub fn new(ticker: &str, years_forward: u32) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            years_forward: clamp_years(years_forward),
            assumptions: Assumptions::default(),
        }
    }

    pub fn with_assumptions(mut self, assumptions: Assumptions) -> Self {
        self.assumptions = assumptions;
        self
    }
}

/// Scenario overrides forwarded to the analysis service. Anything left as
/// `None` is omitted from the body and the service default applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_mid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_mid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_exit_mid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_exit_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_exit_high: Option<f64>,
}

/// Body of `POST /analyze_batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub tickers: Vec<AnalysisRequest>,
}

// ---------------------------------------------------------------------------
// Response side
// ---------------------------------------------------------------------------

/// Mid-case valuation headline for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    pub current_price: f64,
    pub target_price_mid: f64,
    pub total_return_mid: f64,
    pub annualized_mid: f64,
}

/// One row of the historical or forecast table. Columns are whatever the
/// service sends; lookups happen by label at render time.
pub type TableRow = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub summary: Summary,
    #[serde(default)]
    pub hist_table: Vec<TableRow>,
    #[serde(default)]
    pub forecast_table: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<AnalysisResponse>,
}
