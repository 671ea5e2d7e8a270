//! Lumi - a terminal front-end for the school portal demo.
//!
//! Sign in with one of the demo accounts and get the dashboard for that
//! role: overview, progress, a small exercise, an echo chat and a daily
//! report.

mod app;
mod ui;

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
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lumi_core::auth::{generate_salt, hash_secret, SessionGate};
use lumi_core::storage::FileStorage;
use lumi_core::Config;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "lumi.log";

/// Initialize the tracing subscriber. The TUI owns the terminal, so log
/// lines go to a file in the data directory.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let dir = log_dir?;
    if std::fs::create_dir_all(dir).is_err() {
        return None;
    }
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

/// Logging for the one-shot commands, which keep the terminal
fn init_cli_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if let Some(command) = args.get(1) {
        init_cli_tracing();
        return match command.as_str() {
            "--hash-secret" => hash_secret_command(),
            "--logout" => logout_command(),
            "--whoami" => whoami_command(),
            "--version" => {
                println!("lumi {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Usage: lumi [--hash-secret | --logout | --whoami | --version]");
                std::process::exit(2);
            }
        };
    }

    // Initialize logging
    let log_dir = Config::load().data_dir().ok();
    let _log_guard = init_tracing(log_dir.as_deref());
    info!("Lumi starting");

    // Create app
    let mut app = App::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Reopen a stored session or show the login form
    app.resume();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

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

    info!("Lumi shutting down");
    Ok(())
}

/// Print a fresh salt and digest for a secret read from the terminal
fn hash_secret_command() -> Result<()> {
    let secret = rpassword::prompt_password("Secret: ").context("Failed to read secret")?;
    let salt = generate_salt();
    let digest = hash_secret(&salt, &secret)?;
    println!("salt:   {}", salt);
    println!("digest: {}", digest);
    Ok(())
}

fn open_storage() -> Result<(Config, FileStorage)> {
    let config = Config::load();
    let storage = FileStorage::open(&config.data_dir()?)?;
    Ok((config, storage))
}

fn logout_command() -> Result<()> {
    let (config, mut storage) = open_storage()?;
    SessionGate::with_lifetime_hours(config.session_ttl_hours).logout(&mut storage);
    println!("Sessão terminada.");
    Ok(())
}

fn whoami_command() -> Result<()> {
    let (config, storage) = open_storage()?;
    let gate = SessionGate::with_lifetime_hours(config.session_ttl_hours);
    match gate.current(&storage) {
        Some(session) => println!(
            "{} ({}) desde {}",
            session.identifier,
            session.role.display_name(),
            session.created_at.format("%d/%m/%Y %H:%M")
        ),
        None => println!("Sem sessão."),
    }
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

        // Apply finished background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }

        // Let spawned tasks run between frames
        tokio::task::yield_now().await;
    }
}
