//! Concrete adapter implementations for ports.

#[cfg(feature = "binance")]
pub mod binance;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod paper_gateway;
