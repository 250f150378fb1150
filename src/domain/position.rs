//! Single-instrument position tracking.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Flat,
    Long,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Flat => write!(f, "FLAT"),
            Side::Long => write!(f, "LONG"),
        }
    }
}

/// At most one long position; no shorting, no pyramiding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long { entry_price: f64, quantity: f64 },
}

impl Position {
    pub fn side(&self) -> Side {
        match self {
            Position::Flat => Side::Flat,
            Position::Long { .. } => Side::Long,
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long { .. })
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self {
            Position::Long { entry_price, .. } => Some(*entry_price),
            Position::Flat => None,
        }
    }

    /// (price - entry) * quantity; zero when flat.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self {
            Position::Long {
                entry_price,
                quantity,
            } => (price - entry_price) * quantity,
            Position::Flat => 0.0,
        }
    }

    pub fn take_profit_price(&self, fraction: f64) -> Option<f64> {
        self.entry_price().map(|entry| entry * (1.0 + fraction))
    }

    pub fn stop_loss_price(&self, fraction: f64) -> Option<f64> {
        self.entry_price().map(|entry| entry * (1.0 - fraction))
    }

    pub fn should_take_profit(&self, price: f64, fraction: f64) -> bool {
        self.take_profit_price(fraction)
            .is_some_and(|target| price >= target)
    }

    pub fn should_stop_loss(&self, price: f64, fraction: f64) -> bool {
        self.stop_loss_price(fraction)
            .is_some_and(|floor| price <= floor)
    }
}
