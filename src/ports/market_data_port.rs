//! Market data port.

use crate::domain::error::TicktraderError;
use crate::domain::price_bar::PriceBar;

pub trait MarketDataPort {
    /// The most recent `limit` bars for `instrument`, oldest first.
    fn fetch_recent(&self, instrument: &str, limit: usize) -> Result<Vec<PriceBar>, TicktraderError>;
}
