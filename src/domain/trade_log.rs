//! Append-only in-memory trade log.

use chrono::NaiveDateTime;
use std::fmt;

/// Direction of a fill; doubles as the order side sent to a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened when the order for a log entry was dispatched.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OrderOutcome {
    #[default]
    Simulated,
    Filled { order_id: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeLogEntry {
    pub timestamp: NaiveDateTime,
    pub action: TradeAction,
    pub price: f64,
    /// Realized PnL, present on SELL entries only.
    pub pnl: Option<f64>,
    pub outcome: OrderOutcome,
}

impl fmt::Display for TradeLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {:.2}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.action,
            self.price
        )?;
        if let Some(pnl) = self.pnl {
            write!(f, " | PnL {:.6}", pnl)?;
        }
        match &self.outcome {
            OrderOutcome::Simulated => Ok(()),
            OrderOutcome::Filled { order_id } => write!(f, " [order {}]", order_id),
            OrderOutcome::Failed { reason } => write!(f, " [order failed: {}]", reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLog {
    entries: Vec<TradeLogEntry>,
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TradeLogEntry) {
        self.entries.push(entry);
    }

    /// Overwrite the outcome of the newest entry once the gateway has answered.
    pub fn set_last_outcome(&mut self, outcome: OrderOutcome) {
        if let Some(last) = self.entries.last_mut() {
            last.outcome = outcome;
        }
    }

    pub fn entries(&self) -> &[TradeLogEntry] {
        &self.entries
    }

    /// The most recent `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> &[TradeLogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&TradeLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
