//! Order placement port.

use crate::domain::error::TicktraderError;
use crate::domain::trade_log::{OrderOutcome, TradeAction};

/// Acknowledgement returned by a gateway.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderAck {
    /// Venue order id; `None` when nothing was sent to a venue.
    pub order_id: Option<String>,
}

impl OrderAck {
    pub fn simulated() -> Self {
        OrderAck { order_id: None }
    }

    pub fn filled(order_id: impl Into<String>) -> Self {
        OrderAck {
            order_id: Some(order_id.into()),
        }
    }

    pub fn outcome(&self) -> OrderOutcome {
        match &self.order_id {
            Some(id) => OrderOutcome::Filled {
                order_id: id.clone(),
            },
            None => OrderOutcome::Simulated,
        }
    }
}

pub trait ExecutionPort {
    fn place_order(
        &self,
        instrument: &str,
        side: TradeAction,
        quantity: f64,
    ) -> Result<OrderAck, TicktraderError>;

    /// True when orders reach a real venue.
    fn is_live(&self) -> bool;
}
