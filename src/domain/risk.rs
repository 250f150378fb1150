//! Daily risk governor: calendar-day rollover and the per-day entry cap.

use chrono::NaiveDate;

use super::state::BotState;

pub const DEFAULT_MAX_TRADES_PER_DAY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRiskGovernor {
    pub max_trades_per_day: u32,
}

impl Default for DailyRiskGovernor {
    fn default() -> Self {
        DailyRiskGovernor {
            max_trades_per_day: DEFAULT_MAX_TRADES_PER_DAY,
        }
    }
}

impl DailyRiskGovernor {
    pub fn new(max_trades_per_day: u32) -> Self {
        DailyRiskGovernor { max_trades_per_day }
    }

    /// Reset the daily counters when `today` differs from the last active date.
    /// Returns true when a rollover happened.
    pub fn roll_day(&self, state: &mut BotState, today: NaiveDate) -> bool {
        if state.last_active_date == Some(today) {
            return false;
        }
        state.trades_today = 0;
        state.realized_pnl_today = 0.0;
        state.last_active_date = Some(today);
        true
    }

    /// New entries only while under the cap. Exits are never gated.
    pub fn permits_entry(&self, state: &BotState) -> bool {
        state.trades_today < self.max_trades_per_day
    }

    pub fn record_entry(&self, state: &mut BotState) {
        state.trades_today += 1;
    }

    pub fn trades_remaining(&self, state: &BotState) -> u32 {
        self.max_trades_per_day.saturating_sub(state.trades_today)
    }
}
