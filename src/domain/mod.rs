//! Core decision logic: indicators, signals, position state machine and daily risk.

pub mod price_bar;
pub mod indicator;
pub mod strategy;
pub mod signal;
pub mod position;
pub mod trade_log;
pub mod state;
pub mod risk;
pub mod bot_config;
pub mod config_validation;
pub mod engine;
pub mod error;
