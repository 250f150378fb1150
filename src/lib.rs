//! ticktrader — single-instrument EMA/RSI trading bot.
//!
//! Hexagonal architecture: decision logic in [`domain`], port traits in [`ports`],
//! concrete feeds and gateways in [`adapters`], command-line entry in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
