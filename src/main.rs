//! esgdesk - A terminal user interface for ESG reporting data.
//!
//! This application provides a fast, keyboard-driven interface for browsing
//! companies, business units and ESG metrics held by a reporting API, adding
//! and deleting records, and following reporting-period deadlines.

mod api;
mod app;
mod config;
mod forms;
mod models;
mod store;
mod ui;
mod utils;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::Resource;
use app::{App, AppState};
use config::Config;
use models::{BusinessUnit, Company, Metric};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the log directory
const LOG_FILE_NAME: &str = "esgdesk.log";

const USAGE: &str = "\
esgdesk - terminal client for ESG reporting data

USAGE:
    esgdesk            Start the interactive interface
    esgdesk --dump     Print all companies, business units and metrics as JSON
    esgdesk --help     Show this message

ENVIRONMENT:
    ESGDESK_API_URL    API base URL (default http://127.0.0.1:8000/api)
    ESGDESK_API_TOKEN  Bearer token sent with every request
    RUST_LOG           Log filter (default warn)";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize logging to a daily rolling file. The TUI owns the terminal,
/// so nothing may be written to stdout or stderr while it runs. The returned
/// guard flushes the writer on drop.
fn init_file_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Ok(guard)
}

/// Initialize logging to stderr for command-line modes
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = ?e, "Failed to load config, using defaults");
            Config::from_env()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some("--dump") => {
            init_stderr_tracing();
            return dump_all(load_config()).await;
        }
        Some(other) => {
            eprintln!("Unknown argument: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
        None => {}
    }

    // Initialize logging; keep the guard alive until shutdown
    let _log_guard = match Config::log_dir().and_then(|dir| init_file_tracing(&dir)) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {:#}", e);
            None
        }
    };
    info!("esgdesk starting");

    let config = load_config();

    // Create app before touching the terminal so config errors print normally
    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial load of all collections
    app.refresh_all();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("esgdesk shutting down");
    Ok(())
}

/// Fetch all three collections in parallel and print them as JSON.
async fn dump_all(config: Config) -> Result<()> {
    let mut api = api::ApiClient::new(config.api_base_url(), config.request_timeout())?;
    if let Some(token) = config.api_token.clone() {
        api = api.with_token(token);
    }
    info!(base_url = api.base_url(), "Dumping all collections");

    let (companies, business_units, metrics) = futures::try_join!(
        api.list::<Company>(Resource::Companies),
        api.list::<BusinessUnit>(Resource::BusinessUnits),
        api.list::<Metric>(Resource::Metrics),
    )?;

    let counts = (companies.len(), business_units.len(), metrics.len());
    let output = serde_json::json!({
        "companies": companies,
        "business_units": business_units,
        "metrics": metrics,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    eprintln!(
        "Done! {} companies, {} business units, {} metrics.",
        counts.0, counts.1, counts.2
    );
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
