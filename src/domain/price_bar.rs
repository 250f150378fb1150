//! Closing-price bar representation.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    /// Bar open time.
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

impl PriceBar {
    pub fn new(timestamp: NaiveDateTime, close: f64) -> Self {
        PriceBar { timestamp, close }
    }

    /// A usable close is finite and strictly positive.
    pub fn has_valid_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Problems that make a series unusable for one evaluation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesDefect {
    Empty,
    InvalidClose { index: usize },
    OutOfOrder { index: usize },
}

/// Check that bars are non-empty, strictly increasing in time and carry valid closes.
pub fn check_series(bars: &[PriceBar]) -> Result<(), SeriesDefect> {
    if bars.is_empty() {
        return Err(SeriesDefect::Empty);
    }
    for (i, bar) in bars.iter().enumerate() {
        if !bar.has_valid_close() {
            return Err(SeriesDefect::InvalidClose { index: i });
        }
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(SeriesDefect::OutOfOrder { index: i });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at_minute(m: u32, close: f64) -> PriceBar {
        let ts = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(12, m, 0)
            .unwrap();
        PriceBar::new(ts, close)
    }

    #[test]
    fn valid_close() {
        assert!(at_minute(0, 100.0).has_valid_close());
        assert!(!at_minute(0, 0.0).has_valid_close());
        assert!(!at_minute(0, -1.0).has_valid_close());
        assert!(!at_minute(0, f64::NAN).has_valid_close());
        assert!(!at_minute(0, f64::INFINITY).has_valid_close());
    }

    #[test]
    fn empty_series_rejected() {
        assert_eq!(check_series(&[]), Err(SeriesDefect::Empty));
    }

    #[test]
    fn ordered_series_accepted() {
        let bars = vec![at_minute(0, 100.0), at_minute(1, 101.0), at_minute(2, 99.5)];
        assert_eq!(check_series(&bars), Ok(()));
    }

    #[test]
    fn duplicate_timestamp_rejected() {
        let bars = vec![at_minute(0, 100.0), at_minute(1, 101.0), at_minute(1, 102.0)];
        assert_eq!(check_series(&bars), Err(SeriesDefect::OutOfOrder { index: 2 }));
    }

    #[test]
    fn bad_close_reported_with_index() {
        let bars = vec![at_minute(0, 100.0), at_minute(1, f64::NAN)];
        assert_eq!(
            check_series(&bars),
            Err(SeriesDefect::InvalidClose { index: 1 })
        );
    }
}
