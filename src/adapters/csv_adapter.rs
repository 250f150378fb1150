//! CSV file price feed.
//!
//! The file is re-read on every fetch, so another process may append bars to
//! it while the bot runs. Columns are located by header name: the time column
//! is `timestamp` or `open_time`, the price column is `close`. Times are either
//! `YYYY-MM-DD HH:MM:SS` or epoch milliseconds.

use crate::domain::error::TicktraderError;
use crate::domain::price_bar::PriceBar;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{DateTime, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceFeed {
    path: PathBuf,
}

impl CsvPriceFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn error(&self, instrument: &str, reason: String) -> TicktraderError {
        TicktraderError::MarketData {
            instrument: instrument.to_string(),
            reason,
        }
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

impl MarketDataPort for CsvPriceFeed {
    fn fetch_recent(&self, instrument: &str, limit: usize) -> Result<Vec<PriceBar>, TicktraderError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.error(instrument, format!("failed to read {}: {}", self.path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| self.error(instrument, format!("CSV header error: {}", e)))?
            .clone();

        let time_col = headers
            .iter()
            .position(|h| matches!(h.trim(), "timestamp" | "open_time"))
            .ok_or_else(|| self.error(instrument, "missing timestamp column".into()))?;
        let close_col = headers
            .iter()
            .position(|h| h.trim() == "close")
            .ok_or_else(|| self.error(instrument, "missing close column".into()))?;

        let mut bars = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| self.error(instrument, format!("CSV parse error: {}", e)))?;

            let raw_time = record.get(time_col).unwrap_or_default();
            let timestamp = parse_timestamp(raw_time).ok_or_else(|| {
                self.error(instrument, format!("row {}: invalid timestamp {:?}", line + 1, raw_time))
            })?;

            let raw_close = record.get(close_col).unwrap_or_default();
            let close: f64 = raw_close.trim().parse().map_err(|e| {
                self.error(instrument, format!("row {}: invalid close {:?}: {}", line + 1, raw_close, e))
            })?;

            bars.push(PriceBar::new(timestamp, close));
        }

        bars.sort_by_key(|b| b.timestamp);
        let start = bars.len().saturating_sub(limit);
        Ok(bars.split_off(start))
    }
}
