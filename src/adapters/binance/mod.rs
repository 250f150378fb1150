//! Binance spot REST adapters: kline feed and market-order gateway.
//!
//! Signed endpoints carry `timestamp`, `recvWindow` and an HMAC-SHA256
//! `signature` over the query string; the API key goes in `X-MBX-APIKEY`.

mod klines;
mod orders;

pub use klines::{parse_klines, BinanceKlineFeed};
pub use orders::{parse_order_response, BinanceGateway};

use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;

use crate::domain::error::TicktraderError;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";
const RECV_WINDOW_MS: u64 = 5000;

#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Both variables must be set and non-empty.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|v| !v.is_empty())?;
        let api_secret = std::env::var(API_SECRET_ENV).ok().filter(|v| !v.is_empty())?;
        Some(Credentials {
            api_key,
            api_secret,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .finish()
    }
}

/// Hex-encoded HMAC-SHA256 of `query` keyed by `secret`.
pub fn sign_query(secret: &str, query: &str) -> Result<String, String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("invalid signing key: {}", e))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Decode a response body as JSON. The HTTP status stays in the error so a
/// proxy error page is reported as what it is.
pub(crate) fn decode_body(status: StatusCode, text: &str) -> Result<Value, String> {
    serde_json::from_str(text)
        .map_err(|e| format!("HTTP {}: non-JSON body ({}): {}", status, e, body_snippet(text)))
}

pub(crate) fn body_snippet(text: &str) -> String {
    text.trim().chars().take(120).collect()
}

pub(crate) fn http_client() -> Result<reqwest::blocking::Client, TicktraderError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| TicktraderError::Io(std::io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_error_page_keeps_status() {
        let err = decode_body(StatusCode::BAD_GATEWAY, "<html><body>502 Bad Gateway</body></html>")
            .unwrap_err();
        assert!(err.starts_with("HTTP 502 Bad Gateway"));
        assert!(err.contains("<html>"));
    }

    #[test]
    fn json_body_decodes() {
        let body = decode_body(StatusCode::OK, r#"{"orderId": 7}"#).unwrap();
        assert_eq!(body["orderId"], 7);
    }

    #[test]
    fn signature_matches_reference_vector() {
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign_query(secret, query).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn credentials_debug_hides_secrets() {
        let creds = Credentials {
            api_key: "key-123".into(),
            api_secret: "secret-456".into(),
        };
        let text = format!("{:?}", creds);
        assert!(!text.contains("key-123"));
        assert!(!text.contains("secret-456"));
    }
}
