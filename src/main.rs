// ABOUTME: Main entry point for the csvenrich wizard TUI
//
// Binary: csvenrich
// Usage: csvenrich <DATASET.csv> [--endpoint URL] [--delimiter CHAR]
// Runs the two-step configuration wizard over the given CSV and, once the
// user confirms, emits the finalized job configuration as JSON on stdout.

use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, prelude::*, Terminal};
use tracing::info;

mod app;
mod cli;
mod components;
mod config;
mod detect;
mod input;
mod models;
mod suggest;

use app::{App, AppState, EventHandler};
use components::LayoutComponent;
use config::AppConfig;
use suggest::SuggestionClient;

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = cli::Cli::parse();
    let config = AppConfig::load();

    let dataset = input::load_csv(&args.dataset, args.delimiter_byte())?;
    info!(
        "Loaded {} rows, {} columns from {}",
        dataset.rows.len(),
        dataset.columns.len(),
        args.dataset.display()
    );

    let endpoint = args.endpoint.unwrap_or(config.endpoint);
    let client = SuggestionClient::new(endpoint, config.request_timeout_secs)?;

    let state = AppState::new(dataset)
        .with_suggestion_client(client)
        .with_on_start(Box::new(|column, fields| {
            info!(
                "Enrichment configuration confirmed: column '{}', {} fields",
                column,
                fields.len()
            );
        }));
    let mut app = App::new(state);
    let mut layout = LayoutComponent::new();

    let result = run_tui(&mut app, &mut layout).await;
    if result.is_err() {
        cleanup_terminal();
    }
    result?;

    // Hand the finalized configuration to whatever invoked us
    if let Some(job) = app.state.completed.take() {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        info!("Wizard exited without confirming a job");
    }

    Ok(())
}

async fn run_tui(app: &mut App, layout: &mut LayoutComponent) -> Result<()> {
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Try running directly in a terminal instead of redirecting output."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(app, layout, &mut terminal).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    layout: &mut LayoutComponent,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key_event) => {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &app.state)
                    {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            // Abort any suggestion request still in flight; its resolution
            // must not outlive the wizard.
            app.state.abort_pending_suggestion();
            break;
        }
    }

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::prelude::*;

    let log_dir = dirs::data_dir()
        .map(|d| d.join("csvenrich").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".csvenrich/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "csvenrich-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        // Logging is best-effort; the wizard works without it
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csvenrich=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before reporting so the message is readable
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
