//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_bar::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: bars
                .iter()
                .map(|b| IndicatorPoint::undefined(b.timestamp))
                .collect(),
        };
    }

    let mut values = Vec::with_capacity(bars.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = bars[0].close;

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            ema = bar.close * k + ema * (1.0 - k);
        }
        if i < period - 1 {
            values.push(IndicatorPoint::undefined(bar.timestamp));
        } else {
            values.push(IndicatorPoint::defined(bar.timestamp, ema));
        }
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar::new(start + chrono::Duration::minutes(i as i64), close))
            .collect()
    }

    #[test]
    fn ema_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        assert!(series.values[0].value.is_none());
        assert!(series.values[1].value.is_none());
        assert!(series.values[2].value.is_some());
        assert!(series.values[4].value.is_some());
    }

    #[test]
    fn ema_period_1_tracks_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 1);

        assert_eq!(series.values[0].value, Some(10.0));
        assert_eq!(series.values[1].value, Some(20.0));
        assert_eq!(series.values[2].value, Some(30.0));
    }

    #[test]
    fn ema_seeded_from_first_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_ema(&bars, 3);

        let k = 0.5;
        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        let e3 = 40.0 * k + e2 * (1.0 - k);

        assert_relative_eq!(series.values[2].value.unwrap(), e2);
        assert_relative_eq!(series.values[3].value.unwrap(), e3);
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0; 6]);
        let series = calculate_ema(&bars, 3);

        for point in &series.values[2..] {
            assert_relative_eq!(point.value.unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_keeps_bar_timestamps() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let series = calculate_ema(&bars, 2);
        for (bar, point) in bars.iter().zip(&series.values) {
            assert_eq!(bar.timestamp, point.timestamp);
        }
        assert_eq!(series.indicator_type, IndicatorType::Ema(2));
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.values.is_empty());
    }

    #[test]
    fn ema_period_0_is_all_undefined() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn ema_shorter_than_period() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 9);
        assert!(series.latest().is_none());
    }
}
