//! `POST /api/v3/order` market-order gateway.

use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde_json::Value;

use super::{decode_body, http_client, sign_query, Credentials, DEFAULT_BASE_URL, RECV_WINDOW_MS};
use crate::domain::error::TicktraderError;
use crate::domain::trade_log::TradeAction;
use crate::ports::execution_port::{ExecutionPort, OrderAck};

pub struct BinanceGateway {
    client: reqwest::blocking::Client,
    base_url: String,
    credentials: Credentials,
}

impl BinanceGateway {
    pub fn new(base_url: Option<String>, credentials: Credentials) -> Result<Self, TicktraderError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            credentials,
        })
    }

    /// Unsigned query for a MARKET order.
    pub fn order_query(instrument: &str, side: TradeAction, quantity: f64, timestamp_ms: i64) -> String {
        format!(
            "symbol={}&side={}&type=MARKET&quantity={}&recvWindow={}&timestamp={}",
            instrument,
            side.as_str(),
            format_quantity(quantity),
            RECV_WINDOW_MS,
            timestamp_ms
        )
    }
}

/// At most eight decimals, trailing zeros dropped: `0.1 + 0.2` is sent as `0.3`.
pub fn format_quantity(quantity: f64) -> String {
    let fixed = format!("{:.8}", quantity);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    #[serde(rename = "orderId")]
    order_id: u64,
}

#[derive(Debug, Deserialize)]
struct VenueError {
    #[serde(default)]
    code: i64,
    #[serde(default = "unknown_error")]
    msg: String,
}

fn unknown_error() -> String {
    "unknown error".to_string()
}

/// Extract the order id, or the venue's error message.
pub fn parse_order_response(success: bool, body: &Value) -> Result<String, String> {
    if !success {
        let err = VenueError::deserialize(body).unwrap_or_else(|_| VenueError {
            code: 0,
            msg: unknown_error(),
        });
        return Err(format!("venue error {}: {}", err.code, err.msg));
    }
    OrderResponse::deserialize(body)
        .map(|r| r.order_id.to_string())
        .map_err(|e| format!("unexpected order response {}: {}", body, e))
}

impl ExecutionPort for BinanceGateway {
    fn place_order(
        &self,
        instrument: &str,
        side: TradeAction,
        quantity: f64,
    ) -> Result<OrderAck, TicktraderError> {
        let to_error = |reason: String| TicktraderError::Gateway {
            instrument: instrument.to_string(),
            side: side.to_string(),
            quantity,
            reason,
        };

        let query = Self::order_query(instrument, side, quantity, Utc::now().timestamp_millis());
        let signature = sign_query(&self.credentials.api_secret, &query).map_err(to_error)?;
        let url = format!(
            "{}/api/v3/order?{}&signature={}",
            self.base_url.trim_end_matches('/'),
            query,
            signature
        );

        let response = self
            .client
            .post(url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()
            .map_err(|e| to_error(format!("request failed: {}", e)))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| to_error(format!("HTTP {}: failed to read body: {}", status, e)))?;
        let body = decode_body(status, &text).map_err(to_error)?;

        let order_id = parse_order_response(status.is_success(), &body).map_err(to_error)?;
        info!("{} {} {} accepted as order {}", side, quantity, instrument, order_id);
        Ok(OrderAck::filled(order_id))
    }

    fn is_live(&self) -> bool {
        true
    }
}
