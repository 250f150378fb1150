#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::rc::Rc;
use ticktrader::domain::error::TicktraderError;
pub use ticktrader::domain::price_bar::PriceBar;
use ticktrader::domain::trade_log::TradeAction;
use ticktrader::ports::execution_port::{ExecutionPort, OrderAck};
use ticktrader::ports::market_data_port::MarketDataPort;

/// Order as seen by a test gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub instrument: String,
    pub side: TradeAction,
    pub quantity: f64,
}

/// Records every order and acknowledges it with a sequential id.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    pub orders: Rc<RefCell<Vec<PlacedOrder>>>,
    pub live: bool,
}

impl RecordingGateway {
    pub fn new(live: bool) -> Self {
        Self {
            orders: Rc::new(RefCell::new(Vec::new())),
            live,
        }
    }
}

impl ExecutionPort for RecordingGateway {
    fn place_order(
        &self,
        instrument: &str,
        side: TradeAction,
        quantity: f64,
    ) -> Result<OrderAck, TicktraderError> {
        let mut orders = self.orders.borrow_mut();
        orders.push(PlacedOrder {
            instrument: instrument.to_string(),
            side,
            quantity,
        });
        if self.live {
            Ok(OrderAck::filled(format!("order-{}", orders.len())))
        } else {
            Ok(OrderAck::simulated())
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

/// Rejects every order.
pub struct FailingGateway;

impl ExecutionPort for FailingGateway {
    fn place_order(
        &self,
        instrument: &str,
        side: TradeAction,
        quantity: f64,
    ) -> Result<OrderAck, TicktraderError> {
        Err(TicktraderError::Gateway {
            instrument: instrument.to_string(),
            side: side.to_string(),
            quantity,
            reason: "insufficient balance".into(),
        })
    }

    fn is_live(&self) -> bool {
        true
    }
}

/// Serves the given windows one per fetch, then keeps serving the last one.
pub struct MockFeed {
    windows: Vec<Result<Vec<PriceBar>, String>>,
    cursor: RefCell<usize>,
    pub fetches: RefCell<usize>,
}

impl MockFeed {
    pub fn new(windows: Vec<Result<Vec<PriceBar>, String>>) -> Self {
        Self {
            windows,
            cursor: RefCell::new(0),
            fetches: RefCell::new(0),
        }
    }

    /// One growing window per bar of `bars`, starting from `first` bars.
    pub fn growing(bars: &[PriceBar], first: usize) -> Self {
        Self::new(
            (first..=bars.len())
                .map(|end| Ok(bars[..end].to_vec()))
                .collect(),
        )
    }
}

impl MarketDataPort for MockFeed {
    fn fetch_recent(
        &self,
        instrument: &str,
        limit: usize,
    ) -> Result<Vec<PriceBar>, TicktraderError> {
        *self.fetches.borrow_mut() += 1;
        let mut cursor = self.cursor.borrow_mut();
        let idx = (*cursor).min(self.windows.len().saturating_sub(1));
        *cursor += 1;

        match self.windows.get(idx) {
            Some(Ok(bars)) => {
                let start = bars.len().saturating_sub(limit);
                Ok(bars[start..].to_vec())
            }
            Some(Err(reason)) => Err(TicktraderError::MarketData {
                instrument: instrument.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// One-minute bars starting 2026-03-02 09:00.
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let start = at(2, 9, 0);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::new(start + Duration::minutes(i as i64), close))
        .collect()
}

/// Forty rising closes from 100.0 in steps of 0.5, then a pullback to 110.5.
/// With 9/21/14 periods the last bar has fast EMA above slow EMA and RSI
/// near 38.7, which is the first bar of the series that signals an entry.
pub fn pullback_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + 0.5 * i as f64).collect();
    closes.extend([116.5, 113.5, 110.5]);
    closes
}

pub const PULLBACK_ENTRY: f64 = 110.5;
