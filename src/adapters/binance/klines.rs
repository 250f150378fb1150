//! `GET /api/v3/klines` market data feed.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use super::{body_snippet, decode_body, http_client, DEFAULT_BASE_URL};
use crate::domain::error::TicktraderError;
use crate::domain::price_bar::PriceBar;
use crate::ports::market_data_port::MarketDataPort;

pub struct BinanceKlineFeed {
    client: reqwest::blocking::Client,
    base_url: String,
    interval: String,
}

impl BinanceKlineFeed {
    pub fn new(base_url: Option<String>, interval: String) -> Result<Self, TicktraderError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            interval,
        })
    }

    fn klines_url(&self, instrument: &str, limit: usize) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url.trim_end_matches('/'),
            instrument,
            self.interval,
            limit
        )
    }
}

/// Each kline is an array whose element 0 is the open time in epoch
/// milliseconds and element 4 the close price as a decimal string.
pub fn parse_klines(body: &Value) -> Result<Vec<PriceBar>, String> {
    let rows = body
        .as_array()
        .ok_or_else(|| format!("expected array of klines, got {}", body))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let open_time = row
                .get(0)
                .and_then(Value::as_i64)
                .ok_or_else(|| format!("kline {}: missing open time", i))?;
            let timestamp: NaiveDateTime = DateTime::from_timestamp_millis(open_time)
                .ok_or_else(|| format!("kline {}: open time out of range", i))?
                .naive_utc();
            let close = match row.get(4) {
                Some(Value::String(s)) => s
                    .parse::<f64>()
                    .map_err(|e| format!("kline {}: invalid close {:?}: {}", i, s, e))?,
                Some(Value::Number(n)) => n
                    .as_f64()
                    .ok_or_else(|| format!("kline {}: invalid close", i))?,
                _ => return Err(format!("kline {}: missing close", i)),
            };
            Ok(PriceBar::new(timestamp, close))
        })
        .collect()
}

impl MarketDataPort for BinanceKlineFeed {
    fn fetch_recent(&self, instrument: &str, limit: usize) -> Result<Vec<PriceBar>, TicktraderError> {
        let to_error = |reason: String| TicktraderError::MarketData {
            instrument: instrument.to_string(),
            reason,
        };

        let response = self
            .client
            .get(self.klines_url(instrument, limit))
            .send()
            .map_err(|e| to_error(format!("request failed: {}", e)))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| to_error(format!("HTTP {}: failed to read body: {}", status, e)))?;
        if !status.is_success() {
            return Err(to_error(format!("HTTP {}: {}", status, body_snippet(&text))));
        }

        let body = decode_body(status, &text).map_err(to_error)?;
        parse_klines(&body).map_err(to_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_kline_rows() {
        let body = json!([
            [1704067200000i64, "42000.0", "42100.0", "41900.0", "42050.5", "12.3", 1704067259999i64],
            [1704067260000i64, "42050.5", "42200.0", "42000.0", "42150.25", "8.1", 1704067319999i64]
        ]);
        let bars = parse_klines(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 42050.5);
        assert_eq!(bars[1].close, 42150.25);
        assert_eq!(
            bars[1].timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-01-01 00:01:00"
        );
    }

    #[test]
    fn rejects_non_array_body() {
        let body = json!({"code": -1121, "msg": "Invalid symbol."});
        assert!(parse_klines(&body).is_err());
    }

    #[test]
    fn rejects_bad_close() {
        let body = json!([[1704067200000i64, "1", "1", "1", "n/a"]]);
        let err = parse_klines(&body).unwrap_err();
        assert!(err.contains("invalid close"));
    }

    #[test]
    fn url_includes_symbol_interval_and_limit() {
        let feed = BinanceKlineFeed::new(Some("https://example.test/".into()), "1m".into()).unwrap();
        assert_eq!(
            feed.klines_url("BTCUSDT", 200),
            "https://example.test/api/v3/klines?symbol=BTCUSDT&interval=1m&limit=200"
        );
    }
}
