//! Session configuration for the bot. Static for the lifetime of a run.

use crate::domain::risk::DailyRiskGovernor;
use crate::domain::strategy::Strategy;

pub const DEFAULT_INSTRUMENT: &str = "BTCUSDT";
pub const DEFAULT_TRADE_SIZE: f64 = 0.001;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_LOG_TAIL: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub instrument: String,
    /// Fixed quantity bought on every entry and sold on every exit.
    pub trade_size: f64,
    /// Forward orders to a real venue. Needs credentials as well.
    pub live: bool,
    pub strategy: Strategy,
    pub risk: DailyRiskGovernor,
    pub poll_interval_secs: u64,
    pub log_tail: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            instrument: DEFAULT_INSTRUMENT.to_string(),
            trade_size: DEFAULT_TRADE_SIZE,
            live: false,
            strategy: Strategy::default(),
            risk: DailyRiskGovernor::default(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            log_tail: DEFAULT_LOG_TAIL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = BotConfig::default();
        assert_eq!(c.instrument, "BTCUSDT");
        assert_eq!(c.trade_size, 0.001);
        assert!(!c.live);
        assert_eq!(c.risk.max_trades_per_day, 10);
        assert_eq!(c.poll_interval_secs, 10);
        assert_eq!(c.log_tail, 5);
    }

    #[test]
    fn live_override() {
        let c = BotConfig {
            live: true,
            ..BotConfig::default()
        };
        assert!(c.live);
        assert_eq!(c.instrument, "BTCUSDT");
    }
}
