use clap::{Args, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use valuation_dashboard::client::AnalysisClient;
use valuation_dashboard::config::{Config, MAX_YEARS_FORWARD, MIN_YEARS_FORWARD};
use valuation_dashboard::error::{AppError, Result};
use valuation_dashboard::report::render_report;
use valuation_dashboard::types::{AnalysisRequest, Assumptions};

/// Run a valuation through the analysis service and print it.
#[derive(Debug, Parser)]
#[command(name = "analyze", version)]
struct Cli {
    /// Tickers to analyze; more than one goes through the batch endpoint.
    #[arg(required = true)]
    tickers: Vec<String>,

    /// Forecast horizon in years.
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(MIN_YEARS_FORWARD as i64..=MAX_YEARS_FORWARD as i64)
    )]
    years: Option<u32>,

    #[command(flatten)]
    assumptions: AssumptionArgs,
}

/// Scenario overrides; the service defaults apply to anything left out.
#[derive(Debug, Args)]
struct AssumptionArgs {
    /// Revenue CAGR, mid case (e.g. 0.18)
    #[arg(long)]
    rev_mid: Option<f64>,
    #[arg(long)]
    rev_low: Option<f64>,
    #[arg(long)]
    rev_high: Option<f64>,
    /// Net income margin, mid case (e.g. 0.27)
    #[arg(long)]
    margin_mid: Option<f64>,
    #[arg(long)]
    margin_low: Option<f64>,
    #[arg(long)]
    margin_high: Option<f64>,
    /// Exit P/E multiple, mid case (e.g. 30)
    #[arg(long)]
    pe_exit_mid: Option<f64>,
    #[arg(long)]
    pe_exit_low: Option<f64>,
    #[arg(long)]
    pe_exit_high: Option<f64>,
}

impl From<AssumptionArgs> for Assumptions {
    fn from(a: AssumptionArgs) -> Self {
        Self {
            rev_mid: a.rev_mid,
            rev_low: a.rev_low,
            rev_high: a.rev_high,
            margin_mid: a.margin_mid,
            margin_low: a.margin_low,
            margin_high: a.margin_high,
            pe_exit_mid: a.pe_exit_mid,
            pe_exit_low: a.pe_exit_low,
            pe_exit_high: a.pe_exit_high,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cfg, cli).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config, cli: Cli) -> Result<()> {
    let client = AnalysisClient::from_config(&cfg)?.ok_or(AppError::MissingApiUrl)?;
    let years = cli.years.unwrap_or(cfg.default_years_forward);
    let assumptions = Assumptions::from(cli.assumptions);

    let requests: Vec<AnalysisRequest> = cli
        .tickers
        .iter()
        .map(|t| AnalysisRequest::new(t, years).with_assumptions(assumptions.clone()))
        .collect();

    info!(
        "Analyzing {} ticker(s) over {years} years via {}",
        requests.len(),
        client.base_url()
    );

    let reports: Vec<String> = client
        .analyze_many(&requests)
        .await?
        .iter()
        .map(|resp| render_report(resp, years))
        .collect();
    println!("{}", reports.join("\n"));

    Ok(())
}
