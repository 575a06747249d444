//! RealTicker - a terminal dashboard for top-volume stocks.

mod api;
mod app;
mod cli;
mod config;
mod models;
mod ui;

use anyhow::{Context, Result};
use api::ApiClient;
use app::{App, View};
use cli::Args;
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Load configuration
    let config = if let Some(ref path) = args.config {
        Config::load(path)?
    } else {
        Config::load_or_default()
    };

    // CLI flags beat the config file; config defaults carry the rest
    let base_url = args
        .url
        .clone()
        .unwrap_or_else(|| config.general.base_url.clone());
    let timeout = args.timeout.unwrap_or(config.general.timeout);

    let client = ApiClient::new(&base_url, timeout)?;

    // Run in batch mode or interactive mode
    if args.batch {
        run_batch(&client, args.ticker.as_deref()).await
    } else {
        run_interactive(App::new(client)).await
    }
}

/// Run in batch mode (non-interactive, like top -b).
async fn run_batch(client: &ApiClient, ticker: Option<&str>) -> Result<()> {
    let stocks = client
        .top_stocks()
        .await
        .context("Failed to fetch top stocks")?;
    ui::render_batch(&stocks);

    if let Some(ticker) = ticker {
        let detail = client
            .stock_detail(ticker)
            .await
            .with_context(|| format!("Failed to fetch details for {}", ticker))?;
        ui::render_batch_detail(&detail);
    }

    Ok(())
}

/// Run in interactive mode with TUI.
async fn run_interactive(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial fetch; the completion arrives through the app's channel
    app.fetch_top_stocks();

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

    result
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        // Apply whatever the fetch tasks finished since the last frame
        app.drain_events();

        // Draw UI
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout
        if crossterm::event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(app, key.code, key.modifiers);
            }
        } else {
            app.on_tick();
        }

        // Check if we should quit
        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input.
fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Close help overlay on any key
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl-C always quits
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // The error banner takes the keyboard: retry or dismiss
    if matches!(app.view, View::List { error: Some(_) }) {
        match code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('r') => app.fetch_top_stocks(),
            _ => app.dismiss_error(),
        }
        return;
    }

    if matches!(app.view, View::LoadingDetail { .. } | View::Detail(_)) {
        match code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Esc | KeyCode::Backspace => app.back_to_list(),
            KeyCode::Char('h') | KeyCode::Char('?') => app.toggle_help(),
            _ => {}
        }
        return;
    }

    // Table view (or the initial loading screen)
    match code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Home | KeyCode::Char('g') => app.select_top(),
        KeyCode::End | KeyCode::Char('G') => app.select_bottom(),

        // Detail view for the cursor row
        KeyCode::Enter => app.select_stock(),

        // Refresh
        KeyCode::Char('r') => app.fetch_top_stocks(),

        KeyCode::Char('h') | KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}
