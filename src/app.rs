//! Application state and the fetch lifecycle.
//!
//! Spawned requests report back through a channel; nothing in here blocks.
//! The render loop stays dumb, so every transition worth testing lives here.

use crate::api::{ApiClient, ApiError};
use crate::models::{StockDetail, StockSummary};
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// What the main area is showing.
///
/// A tagged state instead of loose booleans: a spinner with a stale banner,
/// or a detail view with half its data, simply has no representation.
#[derive(Debug)]
pub enum View {
    /// Top-10 list request in flight, nothing on screen yet
    LoadingList,
    /// Ranked table, with an optional error banner
    List { error: Option<String> },
    /// Paired history and analysis for `ticker` in flight
    LoadingDetail { ticker: String },
    /// Merged detail on screen
    Detail(Box<StockDetail>),
}

/// Completion of a spawned fetch task.
#[derive(Debug)]
pub enum FetchEvent {
    List {
        seq: u64,
        result: Result<Vec<StockSummary>, ApiError>,
    },
    Detail {
        seq: u64,
        ticker: String,
        result: Result<StockDetail, ApiError>,
    },
}

/// Application state.
/// Everything the event loop needs between two frames.
pub struct App {
    /// Ranked rows, kept in backend order. Survives view changes.
    pub stocks: Vec<StockSummary>,
    /// Current display state
    pub view: View,
    /// Table cursor
    pub selected: usize,
    /// Client handed to spawned fetch tasks
    client: ApiClient,
    /// Completions from spawned tasks
    events_rx: UnboundedReceiver<FetchEvent>,
    events_tx: UnboundedSender<FetchEvent>,
    /// Latest issued sequence per operation; slower responses lose on purpose
    list_seq: u64,
    detail_seq: u64,
    /// Last successful list refresh
    pub last_refresh: Option<Instant>,
    /// Spinner frame counter, advanced by the event loop
    pub tick: usize,
    /// Show help overlay
    pub show_help: bool,
    /// Is the app running
    pub running: bool,
}

impl App {
    /// Create the application around an API client.
    pub fn new(client: ApiClient) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            stocks: Vec::new(),
            view: View::LoadingList,
            selected: 0,
            client,
            events_rx,
            events_tx,
            list_seq: 0,
            detail_seq: 0,
            last_refresh: None,
            tick: 0,
            show_help: false,
            running: true,
        }
    }

    /// Kick off (or retry) the top-10 list fetch.
    ///
    /// Runs once on startup and again on every user refresh or banner retry.
    pub fn fetch_top_stocks(&mut self) {
        let seq = self.begin_list_fetch();
        let client = self.client.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = client.top_stocks().await;
            // receiver gone means we're shutting down
            let _ = tx.send(FetchEvent::List { seq, result });
        });
    }

    /// Fetch history and analysis for the cursor row.
    ///
    /// Only the table can select; while a list refresh is in flight the
    /// rows are not on screen, so selection is ignored rather than letting
    /// the refresh completion stomp a fresh detail fetch.
    pub fn select_stock(&mut self) {
        if !matches!(self.view, View::List { .. }) {
            return;
        }
        let Some(ticker) = self.selected_ticker().map(str::to_string) else {
            return;
        };
        let seq = self.begin_detail_fetch(&ticker);
        let client = self.client.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = client.stock_detail(&ticker).await;
            let _ = tx.send(FetchEvent::Detail {
                seq,
                ticker,
                result,
            });
        });
    }

    /// Return to the table without touching `stocks`. An in-flight detail
    /// fetch is abandoned; its completion no longer matches and is dropped.
    pub fn back_to_list(&mut self) {
        self.view = View::List { error: None };
    }

    /// Drain completed fetches. Called once per loop iteration.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
    }

    /// Apply one fetch completion to the state machine.
    ///
    /// Stale completions are dropped without effect: an older sequence
    /// number, or a detail whose loading state was already left.
    pub fn apply(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::List { seq, result } => {
                if seq != self.list_seq {
                    return;
                }
                match result {
                    Ok(stocks) => {
                        self.stocks = stocks;
                        self.last_refresh = Some(Instant::now());
                        if self.selected >= self.stocks.len() {
                            self.selected = self.stocks.len().saturating_sub(1);
                        }
                        self.view = View::List { error: None };
                    }
                    Err(_) => {
                        self.view = View::List {
                            error: Some(list_error_message(self.client.base_url())),
                        };
                    }
                }
            }
            FetchEvent::Detail {
                seq,
                ticker,
                result,
            } => {
                if seq != self.detail_seq {
                    return;
                }
                if !matches!(self.view, View::LoadingDetail { .. }) {
                    return;
                }
                match result {
                    Ok(detail) => self.view = View::Detail(Box::new(detail)),
                    Err(_) => {
                        self.view = View::List {
                            error: Some(format!("Failed to fetch details for {}", ticker)),
                        };
                    }
                }
            }
        }
    }

    /// Record the start of a list request.
    ///
    /// Split out from [`Self::fetch_top_stocks`] so tests can drive the
    /// state machine without a runtime or a backend.
    fn begin_list_fetch(&mut self) -> u64 {
        self.list_seq += 1;
        self.view = View::LoadingList;
        self.list_seq
    }

    /// Record the start of a detail request for `ticker`.
    fn begin_detail_fetch(&mut self, ticker: &str) -> u64 {
        self.detail_seq += 1;
        self.view = View::LoadingDetail {
            ticker: ticker.to_string(),
        };
        self.detail_seq
    }

    /// Move selection up.
    pub fn select_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move selection down.
    pub fn select_down(&mut self) {
        if self.selected < self.stocks.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    /// Move selection to top.
    pub fn select_top(&mut self) {
        self.selected = 0;
    }

    /// Move selection to bottom.
    pub fn select_bottom(&mut self) {
        self.selected = self.stocks.len().saturating_sub(1);
    }

    /// Ticker under the cursor, if any.
    pub fn selected_ticker(&self) -> Option<&str> {
        self.stocks.get(self.selected).map(|s| s.ticker.as_str())
    }

    /// Dismiss the error banner, keeping whatever rows we still have.
    pub fn dismiss_error(&mut self) {
        if let View::List { error } = &mut self.view {
            *error = None;
        }
    }

    /// Toggle help display.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Advance the spinner.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// Time since the last successful list refresh, human readable.
    pub fn time_since_refresh(&self) -> String {
        match self.last_refresh {
            Some(t) => {
                let elapsed = t.elapsed().as_secs();
                if elapsed < 60 {
                    format!("{}s ago", elapsed)
                } else {
                    format!("{}m ago", elapsed / 60)
                }
            }
            None => "never".to_string(),
        }
    }
}

/// Banner text for a failed list fetch.
fn list_error_message(origin: &str) -> String {
    format!(
        "Failed to fetch stock data. Please ensure the backend is running at {}.",
        origin
    )
}
