//! Signal generation from the latest indicator snapshot.
//!
//! FLAT: ENTER when RSI < buy threshold and fast EMA > slow EMA.
//! LONG: EXIT on take-profit, stop-loss, or RSI > sell threshold.
//! Anything else, including undefined indicators, is HOLD.

use std::fmt;

use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::position::Position;
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    Overbought,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Enter,
    Exit(ExitReason),
    Hold,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::TakeProfit => write!(f, "take-profit"),
            ExitReason::StopLoss => write!(f, "stop-loss"),
            ExitReason::Overbought => write!(f, "rsi above sell threshold"),
        }
    }
}

/// Exactly one signal per call. The price-based exits need no indicator, so
/// they still run for an open position while the snapshot is incomplete.
pub fn evaluate_signal(
    strategy: &Strategy,
    snapshot: Option<&IndicatorSnapshot>,
    price: f64,
    position: &Position,
) -> Signal {
    let rsi = snapshot.and_then(|s| s.rsi);

    match position {
        Position::Flat => {
            let trend_up = snapshot.and_then(|s| s.trend_up());
            match (rsi, trend_up) {
                (Some(rsi), Some(true)) if rsi < strategy.buy_threshold => Signal::Enter,
                _ => Signal::Hold,
            }
        }
        Position::Long { .. } => {
            if position.should_take_profit(price, strategy.take_profit) {
                Signal::Exit(ExitReason::TakeProfit)
            } else if position.should_stop_loss(price, strategy.stop_loss) {
                Signal::Exit(ExitReason::StopLoss)
            } else if rsi.is_some_and(|r| r > strategy.sell_threshold) {
                Signal::Exit(ExitReason::Overbought)
            } else {
                Signal::Hold
            }
        }
    }
}
