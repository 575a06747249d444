//! Terminal user interface with ratatui.
//!
//! Renders the ranked table and the detail chart. None of this is
//! investment advice; there is a disclaimer and everything.

use crate::app::{App, View};
use crate::models::{RiskLevel, StockDetail, StockSummary, Trend};
use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table,
        TableState, Wrap,
    },
    Frame,
};

/// Colors for the UI.
pub struct UiColors {
    pub gain: Color,
    pub loss: Color,
    pub neutral: Color,
    pub muted: Color,
    pub header_bg: Color,
    pub selected_bg: Color,
    pub border: Color,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            gain: Color::Green,
            loss: Color::Red,
            neutral: Color::White,
            muted: Color::Gray,
            header_bg: Color::DarkGray,
            selected_bg: Color::Rgb(40, 40, 60),
            border: Color::DarkGray,
        }
    }
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn spinner(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Render the main UI.
pub fn render(frame: &mut Frame, app: &App) {
    let colors = UiColors::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main area
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0], &colors);

    match &app.view {
        View::LoadingList => render_loading(frame, app, chunks[1]),
        View::List { error } => {
            render_stocks_table(frame, app, chunks[1], &colors);
            if let Some(message) = error {
                render_error(frame, message, &colors);
            }
        }
        View::LoadingDetail { ticker } => {
            render_detail_loading(frame, app, ticker, chunks[1], &colors)
        }
        View::Detail(detail) => render_detail(frame, detail, chunks[1], &colors),
    }

    render_footer(frame, app, chunks[2], &colors);

    if app.show_help {
        render_help_overlay(frame, &colors);
    }
}

/// Render the header with summary information.
fn render_header(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let gains = app.stocks.iter().filter(|s| s.change > 0.0).count();
    let losses = app.stocks.iter().filter(|s| s.change < 0.0).count();
    let flat = app.stocks.len() - gains - losses;

    let header_text = vec![
        Line::from(vec![
            Span::styled(
                "REALTICKER ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("- Top 10 by Volume"),
        ]),
        Line::from(vec![
            Span::styled(format!("{} ", gains), Style::default().fg(colors.gain)),
            Span::raw("up  "),
            Span::styled(format!("{} ", losses), Style::default().fg(colors.loss)),
            Span::raw("down  "),
            Span::styled(
                format!("{} flat  ", flat),
                Style::default().fg(colors.neutral),
            ),
            Span::raw(format!("Updated: {}", app.time_since_refresh())),
        ]),
    ];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors.border)),
    );

    frame.render_widget(header, area);
}

/// Render the ranked stocks table, in the order the backend sent it.
fn render_stocks_table(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let header_cells = ["#", "TICKER", "COMPANY", "PRICE", "CHG%", "VOLUME", "SECTOR"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::White)));

    let header = Row::new(header_cells)
        .style(Style::default().bg(colors.header_bg))
        .height(1);

    let rows = app.stocks.iter().enumerate().map(|(i, stock)| {
        let is_selected = i == app.selected;
        let color = change_color(stock.change, colors);

        let row_style = if is_selected {
            Style::default().bg(colors.selected_bg)
        } else {
            Style::default()
        };

        let cells = vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(stock.ticker.clone()),
            Cell::from(truncate_string(&stock.company, 22)),
            Cell::from(format_price(stock.price)),
            Cell::from(format_change_percent(stock.change)).style(Style::default().fg(color)),
            Cell::from(format_volume(stock.volume)),
            Cell::from(stock.sector.clone()),
        ];

        Row::new(cells).style(row_style)
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Length(8),
        Constraint::Length(24),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Full-area placeholder while the list request is in flight.
fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let box_area = centered_rect(60, 30, area);

    let text = Line::from(Span::styled(
        format!("{} Fetching market data...", spinner(app.tick)),
        Style::default().fg(Color::Cyan),
    ));

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), box_area);
}

/// Placeholder while the paired history+analysis fetch is in flight.
fn render_detail_loading(frame: &mut Frame, app: &App, ticker: &str, area: Rect, colors: &UiColors) {
    let box_area = centered_rect(60, 30, area);

    let text = vec![
        Line::from(Span::styled(
            format!("{} Analyzing {}...", spinner(app.tick), ticker),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "fetching price history and AI analysis",
            Style::default().fg(colors.muted),
        )),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), box_area);
}

/// Render the detail view: title, stat cards, chart, analysis.
fn render_detail(frame: &mut Frame, detail: &StockDetail, area: Rect, colors: &UiColors) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Title + back hint
            Constraint::Length(3),  // Stat cards
            Constraint::Min(8),     // Chart
            Constraint::Length(10), // Analysis
        ])
        .split(area);

    let title = vec![
        Line::from(vec![
            Span::styled(
                detail.ticker.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::raw(detail.company.clone()),
        ]),
        Line::from(Span::styled(
            "Esc: back to list",
            Style::default().fg(colors.muted),
        )),
    ];
    frame.render_widget(Paragraph::new(title), sections[0]);

    render_stat_cards(frame, detail, sections[1], colors);
    render_chart(frame, detail, sections[2], colors);
    render_analysis(frame, detail, sections[3], colors);
}

fn render_stat_cards(frame: &mut Frame, detail: &StockDetail, area: Rect, colors: &UiColors) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let price = Paragraph::new(Line::from(Span::styled(
        format_price(detail.current_price()),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(stat_block(" Current Price ", colors));
    frame.render_widget(price, cards[0]);

    let change = detail.change_percent();
    let change_widget = Paragraph::new(Line::from(Span::styled(
        format_change_percent(change),
        Style::default()
            .fg(change_color(change, colors))
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(stat_block(" 6-Month Change ", colors));
    frame.render_widget(change_widget, cards[1]);
}

fn stat_block<'a>(title: &'a str, colors: &UiColors) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
}

/// Braille line chart of the trailing price window.
fn render_chart(frame: &mut Frame, detail: &StockDetail, area: Rect, colors: &UiColors) {
    let window = detail.chart_window();

    if window.is_empty() {
        let placeholder = Paragraph::new("No price history available")
            .alignment(Alignment::Center)
            .block(chart_block(colors));
        frame.render_widget(placeholder, area);
        return;
    }

    let points: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.price))
        .collect();

    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    for p in window {
        lo = lo.min(p.price);
        hi = hi.max(p.price);
    }

    let x_labels = vec![
        Span::raw(short_date(&window[0].date)),
        Span::raw(short_date(&window[window.len() / 2].date)),
        Span::raw(short_date(&window[window.len() - 1].date)),
    ];
    let y_labels = vec![
        Span::raw(format!("{:.2}", lo * 0.98)),
        Span::raw(format!("{:.2}", (lo * 0.98 + hi * 1.02) / 2.0)),
        Span::raw(format!("{:.2}", hi * 1.02)),
    ];

    let datasets = vec![
        Dataset::default()
            .name("Price")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(chart_block(colors))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(colors.muted))
                .bounds([0.0, (window.len() - 1).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(colors.muted))
                .bounds([lo * 0.98, hi * 1.02])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn chart_block(colors: &UiColors) -> Block<'static> {
    Block::default()
        .title(" 6-Month Price History ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
}

/// Render the AI analysis block under the chart.
fn render_analysis(frame: &mut Frame, detail: &StockDetail, area: Rect, colors: &UiColors) {
    let a = &detail.analysis;
    let trend = Trend::from_label(&a.trend);
    let risk = RiskLevel::from_label(&a.risk_level);

    let text = vec![
        Line::from(vec![
            Span::raw("Trend: "),
            Span::styled(
                format!("{} {}", trend.glyph(), a.trend),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Risk: "),
            Span::styled(
                a.risk_level.clone(),
                Style::default()
                    .fg(risk_color(risk))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(a.analysis.clone()),
        Line::from(""),
        Line::from(vec![
            Span::raw("Suggested action: "),
            Span::styled(
                a.suggested_action.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            a.disclaimer.clone(),
            Style::default()
                .fg(colors.muted)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let block = Paragraph::new(text)
        .block(
            Block::default()
                .title(" AI Analysis ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(block, area);
}

/// Render the footer with keybindings.
fn render_footer(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let mut spans = vec![
        Span::styled(" q", Style::default().fg(Color::Yellow)),
        Span::raw(":quit "),
    ];

    match &app.view {
        View::LoadingList | View::List { .. } => {
            spans.extend([
                Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
                Span::raw(":move "),
                Span::styled("Enter", Style::default().fg(Color::Yellow)),
                Span::raw(":details "),
                Span::styled("r", Style::default().fg(Color::Yellow)),
                Span::raw(":refresh "),
            ]);
        }
        View::LoadingDetail { .. } | View::Detail(_) => {
            spans.extend([
                Span::styled("Esc", Style::default().fg(Color::Yellow)),
                Span::raw(":back "),
            ]);
        }
    }

    spans.extend([
        Span::styled("h", Style::default().fg(Color::Yellow)),
        Span::raw(":help "),
        Span::raw(format!(
            "| {} stocks | Updated: {}",
            app.stocks.len(),
            app.time_since_refresh()
        )),
    ]);

    let footer_widget =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg));

    frame.render_widget(footer_widget, area);
}

/// Render help overlay.
fn render_help_overlay(frame: &mut Frame, colors: &UiColors) {
    let area = centered_rect(60, 60, frame.area());

    let help_text = vec![
        Line::from(Span::styled(
            "REALTICKER HELP",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  ↑/k       Move up"),
        Line::from("  ↓/j       Move down"),
        Line::from("  g/Home    Go to top"),
        Line::from("  G/End     Go to bottom"),
        Line::from(""),
        Line::from("Actions:"),
        Line::from("  Enter     Show history + AI analysis"),
        Line::from("  Esc       Back to the table"),
        Line::from("  r         Refresh the list / retry after an error"),
        Line::from("  q         Quit"),
        Line::from("  h/?       Toggle help"),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Render the error banner with its retry hint.
fn render_error(frame: &mut Frame, error: &str, colors: &UiColors) {
    let area = centered_rect(60, 25, frame.area());

    let text = vec![
        Line::from(error.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "r: retry   any other key: dismiss",
            Style::default().fg(colors.muted),
        )),
    ];

    let error_widget = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.loss)),
        )
        .style(Style::default().fg(colors.loss))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(error_widget, area);
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Gains keep the explicit plus; zero counts as a gain.
fn change_color(change: f64, colors: &UiColors) -> Color {
    if change >= 0.0 {
        colors.gain
    } else {
        colors.loss
    }
}

/// Fixed risk color map; unknown labels stay neutral.
fn risk_color(risk: RiskLevel) -> Color {
    match risk {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
        RiskLevel::Other => Color::Gray,
    }
}

/// Format a price in dollars, two decimals.
fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Signed percent with two decimals; non-finite values format as-is.
fn format_change_percent(percent: f64) -> String {
    format!("{:+.2}%", percent)
}

/// Format volume with suffixes: millions and thousands get one decimal,
/// anything smaller stays a plain integer.
fn format_volume(volume: u64) -> String {
    if volume >= 1_000_000 {
        format!("{:.1}M", volume as f64 / 1_000_000.0)
    } else if volume >= 1_000 {
        format!("{:.1}K", volume as f64 / 1_000.0)
    } else {
        volume.to_string()
    }
}

/// Short month + day axis label, e.g. "Mar 5".
fn short_date(date: &NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Truncate string to max length.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let mut end = max_len.saturating_sub(3);
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Render batch mode output (non-interactive).
pub fn render_batch(stocks: &[StockSummary]) {
    use chrono::Local;

    println!(
        "\n=== REALTICKER {} ===",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "{:>3} {:<8} {:<24} {:>10} {:>9} {:>10} {:<16}",
        "#", "TICKER", "COMPANY", "PRICE", "CHG%", "VOLUME", "SECTOR"
    );
    println!("{}", "-".repeat(88));

    for (i, stock) in stocks.iter().enumerate() {
        println!(
            "{:>3} {:<8} {:<24} {:>10} {:>9} {:>10} {:<16}",
            i + 1,
            stock.ticker,
            truncate_string(&stock.company, 24),
            format_price(stock.price),
            format_change_percent(stock.change),
            format_volume(stock.volume),
            stock.sector
        );
    }

    println!();
}

/// Render a plain-text analysis report for one ticker (batch mode).
pub fn render_batch_detail(detail: &StockDetail) {
    let trend = Trend::from_label(&detail.analysis.trend);

    println!("=== {} - {} ===", detail.ticker, detail.company);
    println!("Current price:  {}", format_price(detail.current_price()));
    println!(
        "6-month change: {}",
        format_change_percent(detail.change_percent())
    );
    println!();
    println!("Trend: {} {}", trend.glyph(), detail.analysis.trend);
    println!("Risk:  {}", detail.analysis.risk_level);
    println!();
    println!("{}", detail.analysis.analysis);
    println!();
    println!("Suggested action: {}", detail.analysis.suggested_action);
    println!("{}", detail.analysis.disclaimer);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_volume_brackets() {
        assert_eq!(format_volume(52_000_000), "52.0M");
        assert_eq!(format_volume(1_234_567), "1.2M");
        assert_eq!(format_volume(48_000), "48.0K");
        assert_eq!(format_volume(1_000), "1.0K");
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(0), "0");
    }

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(182.5), "$182.50");
        assert_eq!(format_price(0.5), "$0.50");
        assert_eq!(format_price(0.0), "$0.00");
    }

    #[test]
    fn test_format_change_percent_keeps_the_sign() {
        assert_eq!(format_change_percent(50.0), "+50.00%");
        assert_eq!(format_change_percent(-20.0), "-20.00%");
        assert_eq!(format_change_percent(0.0), "+0.00%");
        assert_eq!(format_change_percent(2.455), "+2.46%");
    }

    #[test]
    fn test_zero_change_counts_as_a_gain() {
        let colors = UiColors::default();
        assert_eq!(change_color(0.0, &colors), colors.gain);
        assert_eq!(change_color(0.01, &colors), colors.gain);
        assert_eq!(change_color(-0.01, &colors), colors.loss);
    }

    #[test]
    fn test_risk_color_map() {
        assert_eq!(risk_color(RiskLevel::from_label("Low")), Color::Green);
        assert_eq!(risk_color(RiskLevel::from_label("MEDIUM")), Color::Yellow);
        assert_eq!(risk_color(RiskLevel::from_label("high")), Color::Red);
        assert_eq!(risk_color(RiskLevel::from_label("volatile")), Color::Gray);
    }

    #[test]
    fn test_short_date_drops_the_zero_pad() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(short_date(&d), "Mar 5");
        let d = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        assert_eq!(short_date(&d), "Dec 25");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Apple Inc.", 22), "Apple Inc.");
        assert_eq!(
            truncate_string("International Business Machines", 22),
            "International Busin..."
        );
        assert_eq!(truncate_string("abc", 2), "..");
    }
}
