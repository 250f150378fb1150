//! Bot session state and its read-only snapshot.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

use super::position::{Position, Side};
use super::trade_log::{TradeLog, TradeLogEntry};

/// Identity of the most recent bar an evaluation consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarKey {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

/// Everything the engine mutates between ticks. Owned by the caller and
/// handed to [`crate::domain::engine::Engine::evaluate`] by `&mut`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BotState {
    pub position: Position,
    pub trades_today: u32,
    pub realized_pnl_today: f64,
    pub last_active_date: Option<NaiveDate>,
    pub trade_log: TradeLog,
    pub last_bar: Option<BarKey>,
}

impl BotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, log_tail: usize) -> BotSnapshot {
        BotSnapshot {
            side: self.position.side(),
            entry_price: self.position.entry_price(),
            trades_today: self.trades_today,
            realized_pnl_today: self.realized_pnl_today,
            last_active_date: self.last_active_date,
            recent_trades: self.trade_log.tail(log_tail).to_vec(),
        }
    }
}

/// Read-only view for display collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct BotSnapshot {
    pub side: Side,
    pub entry_price: Option<f64>,
    pub trades_today: u32,
    pub realized_pnl_today: f64,
    pub last_active_date: Option<NaiveDate>,
    pub recent_trades: Vec<TradeLogEntry>,
}

impl fmt::Display for BotSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Position:     {}", self.side)?;
        match self.entry_price {
            Some(p) => writeln!(f, "Entry:        {:.2}", p)?,
            None => writeln!(f, "Entry:        -")?,
        }
        writeln!(f, "Trades today: {}", self.trades_today)?;
        writeln!(f, "Daily PnL:    {:.6}", self.realized_pnl_today)?;
        if !self.recent_trades.is_empty() {
            writeln!(f, "Recent trades:")?;
            for entry in &self.recent_trades {
                writeln!(f, "  {}", entry)?;
            }
        }
        Ok(())
    }
}
