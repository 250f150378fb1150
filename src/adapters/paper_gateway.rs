//! Simulation gateway: acknowledges every order without contacting a venue.

use log::debug;

use crate::domain::error::TicktraderError;
use crate::domain::trade_log::TradeAction;
use crate::ports::execution_port::{ExecutionPort, OrderAck};

#[derive(Debug, Default, Clone, Copy)]
pub struct PaperGateway;

impl PaperGateway {
    pub fn new() -> Self {
        PaperGateway
    }
}

impl ExecutionPort for PaperGateway {
    fn place_order(
        &self,
        instrument: &str,
        side: TradeAction,
        quantity: f64,
    ) -> Result<OrderAck, TicktraderError> {
        debug!("paper order {} {} {}", side, quantity, instrument);
        Ok(OrderAck::simulated())
    }

    fn is_live(&self) -> bool {
        false
    }
}
