//! Configuration validation.
//!
//! Runs once at startup so that out-of-range values fail fast instead of
//! surfacing mid-evaluation.

use crate::domain::bot_config::BotConfig;
use crate::domain::error::TicktraderError;

pub fn validate_bot_config(config: &BotConfig) -> Result<(), TicktraderError> {
    validate_instrument(config)?;
    validate_trade_size(config)?;
    validate_periods(config)?;
    validate_thresholds(config)?;
    validate_exit_offsets(config)?;
    validate_trade_cap(config)?;
    validate_poll_interval(config)?;
    Ok(())
}

fn validate_instrument(config: &BotConfig) -> Result<(), TicktraderError> {
    if config.instrument.trim().is_empty() {
        return Err(TicktraderError::ConfigMissing {
            section: "bot".to_string(),
            key: "instrument".to_string(),
        });
    }
    Ok(())
}

fn validate_trade_size(config: &BotConfig) -> Result<(), TicktraderError> {
    if !config.trade_size.is_finite() || config.trade_size <= 0.0 {
        return Err(TicktraderError::invalid(
            "bot",
            "trade_size",
            "trade_size must be positive",
        ));
    }
    Ok(())
}

fn validate_periods(config: &BotConfig) -> Result<(), TicktraderError> {
    let periods = &config.strategy.periods;
    for (key, value) in [
        ("fast_period", periods.fast),
        ("slow_period", periods.slow),
        ("rsi_period", periods.oscillator),
    ] {
        if value == 0 {
            return Err(TicktraderError::invalid(
                "strategy",
                key,
                format!("{} must be at least 1", key),
            ));
        }
    }
    if periods.fast >= periods.slow {
        return Err(TicktraderError::invalid(
            "strategy",
            "fast_period",
            "fast_period must be shorter than slow_period",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &BotConfig) -> Result<(), TicktraderError> {
    let strategy = &config.strategy;
    for (key, value) in [
        ("buy_threshold", strategy.buy_threshold),
        ("sell_threshold", strategy.sell_threshold),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(TicktraderError::invalid(
                "strategy",
                key,
                format!("{} must be between 0 and 100", key),
            ));
        }
    }
    if strategy.buy_threshold >= strategy.sell_threshold {
        return Err(TicktraderError::invalid(
            "strategy",
            "buy_threshold",
            "buy_threshold must be below sell_threshold",
        ));
    }
    Ok(())
}

fn validate_exit_offsets(config: &BotConfig) -> Result<(), TicktraderError> {
    let strategy = &config.strategy;
    if !strategy.take_profit.is_finite() || strategy.take_profit <= 0.0 {
        return Err(TicktraderError::invalid(
            "strategy",
            "take_profit_pct",
            "take_profit_pct must be positive",
        ));
    }
    if !strategy.stop_loss.is_finite() || strategy.stop_loss <= 0.0 || strategy.stop_loss >= 1.0 {
        return Err(TicktraderError::invalid(
            "strategy",
            "stop_loss_pct",
            "stop_loss_pct must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_trade_cap(config: &BotConfig) -> Result<(), TicktraderError> {
    if config.risk.max_trades_per_day == 0 {
        return Err(TicktraderError::invalid(
            "risk",
            "max_trades_per_day",
            "max_trades_per_day must be at least 1",
        ));
    }
    Ok(())
}

fn validate_poll_interval(config: &BotConfig) -> Result<(), TicktraderError> {
    if config.poll_interval_secs == 0 {
        return Err(TicktraderError::invalid(
            "bot",
            "poll_interval_secs",
            "poll_interval_secs must be at least 1",
        ));
    }
    Ok(())
}
