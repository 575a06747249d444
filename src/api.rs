//! HTTP client for the analysis backend.
//!
//! A thin wrapper over three REST endpoints. The backend does the thinking;
//! we do the drawing.

use crate::models::{Analysis, HistoryPoint, StockDetail, StockSummary};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Ranked top-volume listing.
const TOP_STOCKS_PATH: &str = "/api/stocks/top10";

/// Errors surfaced by backend requests.
///
/// Both variants collapse into the same banner on screen; the split matters
/// for tests and for anyone reading a batch-mode error on stderr.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS, timeout, or a body that failed to decode.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered, but with a non-success status.
    #[error("backend returned {0}")]
    Status(StatusCode),
}

/// Client for the dashboard's REST backend.
///
/// Cheap to clone; spawned fetch tasks each take their own copy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the given backend origin.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The backend origin this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the ranked top-volume list. Backend order is preserved.
    pub async fn top_stocks(&self) -> Result<Vec<StockSummary>, ApiError> {
        self.get_json(TOP_STOCKS_PATH).await
    }

    /// Fetch the price history for one ticker.
    pub async fn history(&self, ticker: &str) -> Result<HistoryResponse, ApiError> {
        self.get_json(&history_path(ticker)).await
    }

    /// Ask the backend to generate an analysis for one ticker.
    pub async fn analyze(&self, ticker: &str) -> Result<Analysis, ApiError> {
        self.post_json(&analyze_path(ticker)).await
    }

    /// Fetch history and analysis together.
    ///
    /// The two requests run concurrently and fail as a unit: the detail
    /// view only renders once both halves are present.
    pub async fn stock_detail(&self, ticker: &str) -> Result<StockDetail, ApiError> {
        let (history, analysis) =
            futures::try_join!(self.history(ticker), self.analyze(ticker))?;

        Ok(StockDetail {
            ticker: history.ticker,
            company: history.company,
            history: history.history,
            analysis,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

/// Wire shape of the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub ticker: String,
    pub company: String,
    pub history: Vec<HistoryPoint>,
}

fn history_path(ticker: &str) -> String {
    format!("/api/stocks/{}/history", urlencoding::encode(ticker))
}

fn analyze_path(ticker: &str) -> String {
    format!("/api/stocks/{}/analyze", urlencoding::encode(ticker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_stocks_payload_deserializes() {
        let body = r#"[
            {"ticker":"NVDA","company":"NVIDIA Corporation","price":875.30,
             "change":2.45,"volume":52000000,"sector":"Technology"},
            {"ticker":"TSLA","company":"Tesla Inc.","price":245.80,
             "change":-1.23,"volume":48000000,"sector":"Automotive"}
        ]"#;
        let stocks: Vec<StockSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].ticker, "NVDA");
        assert_eq!(stocks[0].volume, 52_000_000);
        assert_eq!(stocks[1].change, -1.23);
    }

    #[test]
    fn test_history_payload_deserializes() {
        let body = r#"{"ticker":"AAPL","company":"Apple Inc.",
            "history":[{"date":"2026-05-01","price":182.5},
                       {"date":"2026-05-02","price":184.1}]}"#;
        let resp: HistoryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.ticker, "AAPL");
        assert_eq!(resp.company, "Apple Inc.");
        assert_eq!(resp.history.len(), 2);
        assert_eq!(resp.history[1].price, 184.1);
    }

    #[test]
    fn test_analyze_payload_ignores_echoed_ticker() {
        // the analyze endpoint echoes the ticker alongside the analysis
        let body = r#"{"ticker":"AAPL","trend":"Upward","risk_level":"Low",
            "suggested_action":"Long-term investment",
            "analysis":"Consistent growth over the period.",
            "disclaimer":"Not financial advice."}"#;
        let a: Analysis = serde_json::from_str(body).unwrap();
        assert_eq!(a.trend, "Upward");
        assert_eq!(a.risk_level, "Low");
        assert_eq!(a.suggested_action, "Long-term investment");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/", 10).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_tickers_are_path_encoded() {
        assert_eq!(history_path("NVDA"), "/api/stocks/NVDA/history");
        assert_eq!(analyze_path("BRK.B"), "/api/stocks/BRK.B/analyze");
        // anything that would break the path gets escaped
        assert_eq!(history_path("X/Y"), "/api/stocks/X%2FY/history");
    }
}
