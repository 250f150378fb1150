//! Strategy parameters: indicator windows, oscillator thresholds and exit offsets.

use crate::domain::indicator::IndicatorPeriods;

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub periods: IndicatorPeriods,
    /// Enter only while the oscillator is strictly below this level.
    pub buy_threshold: f64,
    /// Exit once the oscillator is strictly above this level.
    pub sell_threshold: f64,
    /// Fraction of entry price, e.g. 0.0015 for 0.15%.
    pub take_profit: f64,
    /// Fraction of entry price, e.g. 0.001 for 0.10%.
    pub stop_loss: f64,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy {
            periods: IndicatorPeriods::default(),
            buy_threshold: 40.0,
            sell_threshold: 60.0,
            take_profit: 0.0015,
            stop_loss: 0.001,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Strategy::default();
        assert_eq!(s.periods.fast, 9);
        assert_eq!(s.periods.slow, 21);
        assert_eq!(s.periods.oscillator, 14);
        assert_eq!(s.buy_threshold, 40.0);
        assert_eq!(s.sell_threshold, 60.0);
        assert_eq!(s.take_profit, 0.0015);
        assert_eq!(s.stop_loss, 0.001);
    }

    #[test]
    fn struct_update_keeps_other_defaults() {
        let s = Strategy {
            buy_threshold: 30.0,
            ..Strategy::default()
        };
        assert_eq!(s.buy_threshold, 30.0);
        assert_eq!(s.sell_threshold, 60.0);
    }
}
