use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use valuation_dashboard::config::{Config, CHANNEL_CAPACITY, TICK_RATE_MS};
use valuation_dashboard::dashboard::{AnalysisOutcome, Dashboard};
use valuation_dashboard::error::Result;
use valuation_dashboard::input::{handle_key, Action};
use valuation_dashboard::ui::render;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    // The terminal belongs to the UI, so logs go to a file.
    match OpenOptions::new().create(true).append(true).open(&cfg.log_file) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&cfg.log_level))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(e) => eprintln!("Logging disabled, cannot open {}: {e}", cfg.log_file),
    }

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let mut dash = Dashboard::from_config(&cfg)?;
    if cfg.api_url.is_none() {
        warn!("ANALYSIS_API_URL not set, analyze will report a configuration error");
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut dash).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("dashboard closed");
    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    dash: &mut Dashboard,
) -> Result<()> {
    let tick = Duration::from_millis(TICK_RATE_MS);
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<AnalysisOutcome>(CHANNEL_CAPACITY);

    loop {
        terminal.draw(|f| render(f, dash))?;

        while let Ok(outcome) = outcome_rx.try_recv() {
            dash.finish_analyze(outcome);
        }

        if !event::poll(tick)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match handle_key(dash, key) {
                Action::Quit => return Ok(()),
                Action::Analyze => {
                    if let Some(pending) = dash.begin_analyze() {
                        let tx = outcome_tx.clone();
                        tokio::spawn(async move {
                            let outcome = pending.run().await;
                            if tx.send(outcome).await.is_err() {
                                warn!("dashboard closed before analysis finished");
                            }
                        });
                    }
                }
                Action::None => {}
            }
        }
    }
}
