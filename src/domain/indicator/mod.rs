//! Indicator pipeline.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorType`: Indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values
//! - `IndicatorSnapshot`: fast EMA, slow EMA and RSI aligned on one bar
//!
//! Every function here is pure: the same bars always produce the same output.

pub mod ema;
pub mod rsi;

use chrono::NaiveDateTime;
use std::fmt;

use crate::domain::price_bar::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    /// `None` while the indicator is still warming up.
    pub value: Option<f64>,
}

impl IndicatorPoint {
    pub fn defined(timestamp: NaiveDateTime, value: f64) -> Self {
        IndicatorPoint {
            timestamp,
            value: Some(value),
        }
    }

    pub fn undefined(timestamp: NaiveDateTime) -> Self {
        IndicatorPoint {
            timestamp,
            value: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value on the most recent bar, if defined.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().and_then(|p| p.value)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

/// Lookback windows for the three indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPeriods {
    pub fast: usize,
    pub slow: usize,
    pub oscillator: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        IndicatorPeriods {
            fast: 9,
            slow: 21,
            oscillator: 14,
        }
    }
}

impl IndicatorPeriods {
    /// Bars needed before every indicator is defined.
    pub fn warmup(&self) -> usize {
        self.fast.max(self.slow).max(self.oscillator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub timestamp: NaiveDateTime,
    pub fast_ema: Option<f64>,
    pub slow_ema: Option<f64>,
    pub rsi: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn is_complete(&self) -> bool {
        self.fast_ema.is_some() && self.slow_ema.is_some() && self.rsi.is_some()
    }

    /// True when the fast average is strictly above the slow one.
    pub fn trend_up(&self) -> Option<bool> {
        Some(self.fast_ema? > self.slow_ema?)
    }
}

impl fmt::Display for IndicatorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(v: Option<f64>) -> String {
            v.map(|x| format!("{:.2}", x)).unwrap_or_else(|| "-".to_string())
        }
        write!(
            f,
            "{} fast={} slow={} rsi={}",
            self.timestamp,
            show(self.fast_ema),
            show(self.slow_ema),
            show(self.rsi)
        )
    }
}

/// One snapshot per bar.
pub fn compute_snapshots(bars: &[PriceBar], periods: &IndicatorPeriods) -> Vec<IndicatorSnapshot> {
    let fast = ema::calculate_ema(bars, periods.fast);
    let slow = ema::calculate_ema(bars, periods.slow);
    let rsi = rsi::calculate_rsi(bars, periods.oscillator);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorSnapshot {
            timestamp: bar.timestamp,
            fast_ema: fast.values[i].value,
            slow_ema: slow.values[i].value,
            rsi: rsi.values[i].value,
        })
        .collect()
}

/// Snapshot of the most recent bar, or `None` for an empty series.
pub fn latest_snapshot(bars: &[PriceBar], periods: &IndicatorPeriods) -> Option<IndicatorSnapshot> {
    compute_snapshots(bars, periods).pop()
}
