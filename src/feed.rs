//! Market-cap feed
//!
//! Fetches the current market cap from the public coin endpoint. Each
//! refresh runs on its own short-lived thread and reports back over an mpsc
//! channel; the main loop drains results non-blockingly each frame.
//! Overlapping refreshes race and the last arrival wins.

use serde::Deserialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything that makes live data unavailable. All variants collapse into
/// the same fallback rendering; the distinction only matters for diagnostics.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("market cap missing from response")]
    MissingMarketCap,
}

/// JSON shape of the coin endpoint; only the one nested field is read
#[derive(Deserialize)]
struct CoinResponse {
    market_data: Option<MarketData>,
}

#[derive(Deserialize)]
struct MarketData {
    market_cap: Option<MarketCap>,
}

#[derive(Deserialize)]
struct MarketCap {
    usd: Option<f64>,
}

/// Extract `market_data.market_cap.usd` from a response body.
/// A body missing any level of the chain is a `MissingMarketCap`, treated
/// identically to a network failure by the caller.
pub fn parse_market_cap(body: &str) -> Result<f64, FeedError> {
    let response: CoinResponse = serde_json::from_str(body)?;
    response
        .market_data
        .and_then(|d| d.market_cap)
        .and_then(|c| c.usd)
        .ok_or(FeedError::MissingMarketCap)
}

fn fetch_market_cap(client: &reqwest::blocking::Client, url: &str) -> Result<f64, FeedError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status(status.as_u16()));
    }
    let body = response.text()?;
    parse_market_cap(&body)
}

/// Market-cap poller. Requests run on background threads; results are
/// drained with `poll()` from the render loop.
pub struct MarketFeed {
    url: String,
    client: reqwest::blocking::Client,
    sender: Sender<Result<f64, FeedError>>,
    receiver: Receiver<Result<f64, FeedError>>,
    in_flight: usize,
}

impl MarketFeed {
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            url: url.into(),
            client,
            sender,
            receiver,
            in_flight: 0,
        })
    }

    /// Kick off one fetch. Never blocks; the result arrives via `poll()`.
    /// Concurrent requests are allowed and race (last-completed wins).
    pub fn request_refresh(&mut self) {
        self.in_flight += 1;
        let client = self.client.clone();
        let url = self.url.clone();
        let sender = self.sender.clone();

        thread::spawn(move || {
            let outcome = fetch_market_cap(&client, &url);
            // Main thread gone; nothing left to report to
            let _ = sender.send(outcome);
        });
    }

    /// Drain completed fetches (non-blocking), returning the most recent
    /// outcome if any arrived. Older outcomes are discarded unseen.
    pub fn poll(&mut self) -> Option<Result<f64, FeedError>> {
        let mut latest = None;
        while let Ok(outcome) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            latest = Some(outcome);
        }
        latest
    }

    /// True while at least one fetch has not reported back
    pub fn in_flight(&self) -> bool {
        self.in_flight > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let body = r#"{"market_data":{"market_cap":{"usd":25000000.0}}}"#;
        assert_eq!(parse_market_cap(body).unwrap(), 25_000_000.0);
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let body = r#"{"id":"treadmill","market_data":{"market_cap":{"usd":1234.5,"eur":1100.0},"total_volume":{}}}"#;
        assert_eq!(parse_market_cap(body).unwrap(), 1234.5);
    }

    #[test]
    fn test_parse_missing_usd() {
        let body = r#"{"market_data":{"market_cap":{"eur":1100.0}}}"#;
        assert!(matches!(
            parse_market_cap(body),
            Err(FeedError::MissingMarketCap)
        ));
    }

    #[test]
    fn test_parse_missing_market_cap() {
        let body = r#"{"market_data":{}}"#;
        assert!(matches!(
            parse_market_cap(body),
            Err(FeedError::MissingMarketCap)
        ));
    }

    #[test]
    fn test_parse_missing_market_data() {
        let body = r#"{"id":"treadmill"}"#;
        assert!(matches!(
            parse_market_cap(body),
            Err(FeedError::MissingMarketCap)
        ));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse_market_cap("not json"),
            Err(FeedError::Body(_))
        ));
    }

    #[test]
    fn test_poll_empty() {
        let mut feed = MarketFeed::new("http://127.0.0.1:9/none").unwrap();
        assert!(feed.poll().is_none());
        assert!(!feed.in_flight());
    }

    #[test]
    fn test_poll_keeps_latest() {
        let mut feed = MarketFeed::new("http://127.0.0.1:9/none").unwrap();
        feed.in_flight = 2;
        feed.sender.send(Ok(1.0)).unwrap();
        feed.sender.send(Ok(2.0)).unwrap();
        let latest = feed.poll().unwrap().unwrap();
        assert_eq!(latest, 2.0);
        assert!(!feed.in_flight());
        assert!(feed.poll().is_none());
    }
}
