//! Tick evaluation and the FLAT/LONG position state machine.
//!
//! One call to [`Engine::evaluate`] consumes one price window and performs at
//! most one transition:
//! 1. Reject empty or malformed series (state untouched)
//! 2. Roll the trading day if the calendar date changed
//! 3. Skip a window whose latest bar was already evaluated
//! 4. Compute the indicator snapshot and the signal
//! 5. Apply ENTER (gated by the daily cap) or EXIT, append to the trade log
//! 6. Dispatch the order to the execution gateway
//!
//! Gateway dispatch is optimistic: the transition is committed before the
//! order is sent. A failed order is recorded on the log entry and returned as
//! an error, but the position and PnL are not rolled back.

use chrono::NaiveDateTime;
use log::{debug, error, info, warn};

use crate::domain::bot_config::BotConfig;
use crate::domain::config_validation::validate_bot_config;
use crate::domain::error::TicktraderError;
use crate::domain::indicator::{latest_snapshot, IndicatorSnapshot};
use crate::domain::position::Position;
use crate::domain::price_bar::{check_series, PriceBar, SeriesDefect};
use crate::domain::signal::{evaluate_signal, ExitReason, Signal};
use crate::domain::state::{BarKey, BotSnapshot, BotState};
use crate::domain::trade_log::{OrderOutcome, TradeAction, TradeLogEntry};
use crate::ports::execution_port::ExecutionPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The feed returned no usable series.
    Malformed(SeriesDefect),
    /// The latest bar is identical to the one evaluated last tick.
    Stale,
}

/// What a single evaluation did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    Skipped(SkipReason),
    Held,
    /// ENTER was produced but the daily cap was already reached.
    EntrySuppressed,
    Entered {
        price: f64,
    },
    Exited {
        price: f64,
        pnl: f64,
        reason: ExitReason,
    },
}

pub struct Engine {
    config: BotConfig,
    gateway: Box<dyn ExecutionPort>,
}

impl Engine {
    /// Validates the configuration; an invalid one never reaches evaluation.
    pub fn new(config: BotConfig, gateway: Box<dyn ExecutionPort>) -> Result<Self, TicktraderError> {
        validate_bot_config(&config)?;
        Ok(Engine { config, gateway })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn is_live(&self) -> bool {
        self.gateway.is_live()
    }

    pub fn status(&self, state: &BotState) -> BotSnapshot {
        state.snapshot(self.config.log_tail)
    }

    pub fn evaluate(
        &self,
        state: &mut BotState,
        bars: &[PriceBar],
        now: NaiveDateTime,
    ) -> Result<Tick, TicktraderError> {
        if let Err(defect) = check_series(bars) {
            warn!("skipping tick for {}: unusable price series ({:?})", self.config.instrument, defect);
            return Ok(Tick::Skipped(SkipReason::Malformed(defect)));
        }
        let Some(latest) = bars.last() else {
            return Ok(Tick::Skipped(SkipReason::Malformed(SeriesDefect::Empty)));
        };

        self.begin_tick(state, now);

        let key = BarKey {
            timestamp: latest.timestamp,
            close: latest.close,
        };
        if state.last_bar == Some(key) {
            debug!("bar {} already evaluated", latest.timestamp);
            return Ok(Tick::Skipped(SkipReason::Stale));
        }
        state.last_bar = Some(key);

        let snapshot = latest_snapshot(bars, &self.config.strategy.periods);
        if let Some(s) = &snapshot {
            debug!("{} {}", self.config.instrument, s);
        }
        self.apply_signal(state, snapshot.as_ref(), latest.close, now)
    }

    /// Evaluate an already computed snapshot. Performs the day rollover but
    /// no freshness check.
    pub fn evaluate_snapshot(
        &self,
        state: &mut BotState,
        snapshot: Option<&IndicatorSnapshot>,
        price: f64,
        now: NaiveDateTime,
    ) -> Result<Tick, TicktraderError> {
        self.begin_tick(state, now);
        self.apply_signal(state, snapshot, price, now)
    }

    fn begin_tick(&self, state: &mut BotState, now: NaiveDateTime) {
        let had_date = state.last_active_date.is_some();
        if self.config.risk.roll_day(state, now.date()) && had_date {
            info!("new trading day {}: daily counters reset", now.date());
        }
    }

    fn apply_signal(
        &self,
        state: &mut BotState,
        snapshot: Option<&IndicatorSnapshot>,
        price: f64,
        now: NaiveDateTime,
    ) -> Result<Tick, TicktraderError> {
        match evaluate_signal(&self.config.strategy, snapshot, price, &state.position) {
            Signal::Hold => {
                if state.position.is_long() {
                    debug!(
                        "holding {} @ {:.2}, unrealized pnl {:.6}",
                        self.config.instrument,
                        price,
                        state.position.unrealized_pnl(price)
                    );
                }
                Ok(Tick::Held)
            }
            Signal::Enter => {
                if !self.config.risk.permits_entry(state) {
                    info!(
                        "entry suppressed: {} trades taken today (cap {})",
                        state.trades_today, self.config.risk.max_trades_per_day
                    );
                    return Ok(Tick::EntrySuppressed);
                }
                self.open_long(state, price, now)
            }
            Signal::Exit(reason) => self.close_long(state, price, now, reason),
        }
    }

    fn open_long(
        &self,
        state: &mut BotState,
        price: f64,
        now: NaiveDateTime,
    ) -> Result<Tick, TicktraderError> {
        state.position = Position::Long {
            entry_price: price,
            quantity: self.config.trade_size,
        };
        self.config.risk.record_entry(state);
        state.trade_log.push(TradeLogEntry {
            timestamp: now,
            action: TradeAction::Buy,
            price,
            pnl: None,
            outcome: OrderOutcome::Simulated,
        });
        info!(
            "BUY {} {} @ {:.2} ({} entries left today)",
            self.config.trade_size,
            self.config.instrument,
            price,
            self.config.risk.trades_remaining(state)
        );

        self.dispatch(state, TradeAction::Buy)?;
        Ok(Tick::Entered { price })
    }

    fn close_long(
        &self,
        state: &mut BotState,
        price: f64,
        now: NaiveDateTime,
        reason: ExitReason,
    ) -> Result<Tick, TicktraderError> {
        let Position::Long {
            entry_price,
            quantity,
        } = state.position
        else {
            return Ok(Tick::Held);
        };

        let pnl = (price - entry_price) * quantity;
        state.realized_pnl_today += pnl;
        state.position = Position::Flat;
        state.trade_log.push(TradeLogEntry {
            timestamp: now,
            action: TradeAction::Sell,
            price,
            pnl: Some(pnl),
            outcome: OrderOutcome::Simulated,
        });
        info!(
            "SELL {} {} @ {:.2} ({}), pnl {:.6}, daily pnl {:.6}",
            quantity, self.config.instrument, price, reason, pnl, state.realized_pnl_today
        );

        self.dispatch(state, TradeAction::Sell)?;
        Ok(Tick::Exited { price, pnl, reason })
    }

    fn dispatch(&self, state: &mut BotState, side: TradeAction) -> Result<(), TicktraderError> {
        match self
            .gateway
            .place_order(&self.config.instrument, side, self.config.trade_size)
        {
            Ok(ack) => {
                state.trade_log.set_last_outcome(ack.outcome());
                Ok(())
            }
            Err(e) => {
                error!("{}; position state kept", e);
                state.trade_log.set_last_outcome(OrderOutcome::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
