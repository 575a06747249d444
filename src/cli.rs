//! Command-line interface.
//!
//! A handful of flags; everything else is a keybinding.

use clap::Parser;
use std::path::PathBuf;

/// A terminal dashboard for simulated top-volume stocks.
///
/// RealTicker lists the ten most traded tickers from its backend and,
/// for any row you select, charts six months of price history next to
/// an AI-generated analysis of the trend.
#[derive(Parser, Debug, Clone)]
#[command(name = "realticker")]
#[command(version)]
#[command(about = "A terminal dashboard for top-volume stocks with AI analysis", long_about = None)]
pub struct Args {
    /// Backend origin, e.g. http://localhost:8000
    ///
    /// Falls back to the config file, then to http://localhost:8000.
    #[arg(short = 'u', long, env = "REALTICKER_URL")]
    pub url: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "REALTICKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, env = "REALTICKER_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Batch mode - print the ranked table to stdout and exit (like top -b)
    #[arg(short = 'b', long)]
    pub batch: bool,

    /// In batch mode, also print the analysis report for one ticker
    #[arg(short = 't', long, requires = "batch")]
    pub ticker: Option<String>,
}

impl Args {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["realticker"]);
        assert_eq!(args.url, None);
        assert_eq!(args.timeout, None);
        assert!(!args.batch);
        assert_eq!(args.ticker, None);
    }

    #[test]
    fn test_url_flag() {
        let args = Args::parse_from(["realticker", "-u", "http://10.0.0.5:9000"]);
        assert_eq!(args.url.as_deref(), Some("http://10.0.0.5:9000"));

        let args = Args::parse_from(["realticker", "--url", "http://backend:8000"]);
        assert_eq!(args.url.as_deref(), Some("http://backend:8000"));
    }

    #[test]
    fn test_batch_with_ticker() {
        let args = Args::parse_from(["realticker", "-b", "-t", "NVDA"]);
        assert!(args.batch);
        assert_eq!(args.ticker.as_deref(), Some("NVDA"));
    }

    #[test]
    fn test_ticker_requires_batch() {
        let result = Args::try_parse_from(["realticker", "-t", "NVDA"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_timeout_flag() {
        let args = Args::parse_from(["realticker", "--timeout", "30"]);
        assert_eq!(args.timeout, Some(30));
    }
}
