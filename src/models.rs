//! Data models for the market dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the ranked top-volume list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSummary {
    /// Ticker symbol (e.g., "AAPL")
    pub ticker: String,
    /// Company name
    pub company: String,
    /// Latest price
    pub price: f64,
    /// Daily percentage change, signed
    pub change: f64,
    /// Shares traded; the backend ranks the list by this
    pub volume: u64,
    /// Sector tag
    pub sector: String,
}

/// A single closing price on a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// AI-generated reading of a stock's recent history.
///
/// `trend` and `risk_level` are open label sets chosen by the backend;
/// [`Trend`] and [`RiskLevel`] give them fixed display mappings while the
/// raw strings are shown verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub trend: String,
    pub risk_level: String,
    pub analysis: String,
    pub suggested_action: String,
    pub disclaimer: String,
}

/// Number of trailing history points shown in the detail chart.
pub const CHART_WINDOW: usize = 90;

/// Merged history and analysis for the stock being inspected.
///
/// Built only once both detail requests have succeeded, so a complete
/// analysis is always present. Dropped on "back"; re-selecting a ticker
/// fetches a fresh copy.
#[derive(Debug, Clone)]
pub struct StockDetail {
    pub ticker: String,
    pub company: String,
    /// Chronologically ascending, one point per trading day
    pub history: Vec<HistoryPoint>,
    pub analysis: Analysis,
}

impl StockDetail {
    /// Price at the latest point, or 0 for an empty history.
    pub fn current_price(&self) -> f64 {
        self.history.last().map_or(0.0, |p| p.price)
    }

    /// Price at the start of the full history, or 0 when empty.
    pub fn baseline_price(&self) -> f64 {
        self.history.first().map_or(0.0, |p| p.price)
    }

    /// Percentage change from the baseline to the latest price.
    ///
    /// A zero baseline divides to a non-finite value; callers format the
    /// result as-is.
    pub fn change_percent(&self) -> f64 {
        let baseline = self.baseline_price();
        (self.current_price() - baseline) / baseline * 100.0
    }

    /// Trailing window of points feeding the chart. The change stats use
    /// the full history; only the chart is trimmed.
    pub fn chart_window(&self) -> &[HistoryPoint] {
        let start = self.history.len().saturating_sub(CHART_WINDOW);
        &self.history[start..]
    }
}

/// Qualitative direction label, parsed case-insensitively from the
/// backend's free-form trend string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Upward,
    Downward,
    Sideways,
    Other,
}

impl Trend {
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "upward" => Trend::Upward,
            "downward" => Trend::Downward,
            "sideways" => Trend::Sideways,
            _ => Trend::Other,
        }
    }

    /// Glyph shown next to the trend label.
    pub fn glyph(self) -> &'static str {
        match self {
            Trend::Upward => "▲",
            Trend::Downward => "▼",
            Trend::Sideways => "↔",
            Trend::Other => "·",
        }
    }
}

/// Qualitative risk bucket, parsed case-insensitively from the backend's
/// free-form risk string. Unknown labels fall through to [`RiskLevel::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Other,
}

impl RiskLevel {
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn point(date: &str, price: f64) -> HistoryPoint {
        HistoryPoint {
            date: date.parse().unwrap(),
            price,
        }
    }

    fn detail(history: Vec<HistoryPoint>) -> StockDetail {
        StockDetail {
            ticker: "AAPL".to_string(),
            company: "Apple Inc".to_string(),
            history,
            analysis: Analysis {
                trend: "Upward".to_string(),
                risk_level: "Low".to_string(),
                analysis: "Steady growth.".to_string(),
                suggested_action: "Long-term investment".to_string(),
                disclaimer: "Not financial advice.".to_string(),
            },
        }
    }

    #[test]
    fn change_percent_spans_the_full_history() {
        let d = detail(vec![
            point("2026-01-02", 100.0),
            point("2026-01-03", 120.0),
            point("2026-01-04", 150.0),
        ]);
        assert_eq!(d.current_price(), 150.0);
        assert_eq!(d.baseline_price(), 100.0);
        assert!((d.change_percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn change_percent_negative() {
        let d = detail(vec![point("2026-01-02", 100.0), point("2026-01-03", 80.0)]);
        assert!((d.change_percent() + 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_history_prices_default_to_zero() {
        let d = detail(Vec::new());
        assert_eq!(d.current_price(), 0.0);
        assert_eq!(d.baseline_price(), 0.0);
        // 0/0 stays non-finite rather than being clamped
        assert!(d.change_percent().is_nan());
    }

    #[test]
    fn zero_baseline_is_non_finite() {
        let d = detail(vec![point("2026-01-02", 0.0), point("2026-01-03", 50.0)]);
        assert!(d.change_percent().is_infinite());
    }

    #[test]
    fn chart_window_trims_to_trailing_points() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let history: Vec<HistoryPoint> = (0..180)
            .map(|i| HistoryPoint {
                date: start + Days::new(i),
                price: 100.0 + i as f64,
            })
            .collect();
        let d = detail(history);

        let window = d.chart_window();
        assert_eq!(window.len(), CHART_WINDOW);
        assert_eq!(window[0].price, 190.0);
        assert_eq!(window.last().unwrap().price, 279.0);
        // stats still come from the untrimmed history
        assert_eq!(d.baseline_price(), 100.0);
        assert_eq!(d.current_price(), 279.0);
    }

    #[test]
    fn chart_window_keeps_short_histories_whole() {
        let d = detail(vec![point("2026-01-02", 1.0), point("2026-01-03", 2.0)]);
        assert_eq!(d.chart_window().len(), 2);
    }

    #[test]
    fn trend_labels_parse_case_insensitively() {
        assert_eq!(Trend::from_label("Upward"), Trend::Upward);
        assert_eq!(Trend::from_label("DOWNWARD"), Trend::Downward);
        assert_eq!(Trend::from_label("sideways"), Trend::Sideways);
        assert_eq!(Trend::from_label("choppy"), Trend::Other);
    }

    #[test]
    fn risk_labels_parse_case_insensitively() {
        assert_eq!(RiskLevel::from_label("LOW"), RiskLevel::Low);
        assert_eq!(RiskLevel::from_label("Medium"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_label("high"), RiskLevel::High);
        assert_eq!(RiskLevel::from_label("extreme"), RiskLevel::Other);
    }

    #[test]
    fn history_point_deserializes_iso_dates() {
        let p: HistoryPoint =
            serde_json::from_str(r#"{"date":"2026-03-05","price":123.45}"#).unwrap();
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
        assert_eq!(p.price, 123.45);
    }
}
