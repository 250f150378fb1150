//! Port traits at the edges of the engine.

pub mod config_port;
pub mod execution_port;
pub mod market_data_port;
