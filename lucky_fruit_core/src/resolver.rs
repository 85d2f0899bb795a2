//! Round resolution. Lock order is always round lock, then ledger slot.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::EngineConfig,
    engine::draw_outcome,
    error::{ConfigError, EngineError, EngineResult},
    history::{History, HistoryEntry},
    ledger::{Account, Ledger},
    override_buffer::{OverrideBuffer, OverrideStatus},
    paytable::compute_payout,
    rng::{source_from_seed, SymbolSource},
    symbols::{Outcome, Symbol},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinResult {
    pub round: u64,
    pub wager: u64,
    pub outcome: Outcome,
    pub payout: u64,
    pub balance: u64,
    pub cumulative_winnings: u64,
    pub forced: bool,
}

struct RoundState {
    source: Box<dyn SymbolSource>,
    overrides: OverrideBuffer,
    history: History,
    next_round: u64,
}

pub struct RoundEngine {
    ledger: Ledger,
    state: Mutex<RoundState>,
}

impl RoundEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::with_source(config, source_from_seed(config.seed))
    }

    /// Builds an engine drawing random rounds from `source`.
    pub fn with_source(
        config: &EngineConfig,
        source: Box<dyn SymbolSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let ledger = Ledger::new(config.starting_balance);
        for player in &config.players {
            ledger.open(&player.user, player.balance);
        }
        Ok(Self {
            ledger,
            state: Mutex::new(RoundState {
                source,
                overrides: OverrideBuffer::default(),
                history: History::new(config.history_capacity),
                next_round: config.first_round,
            }),
        })
    }

    pub fn spin(&self, user: &str, wager: u64) -> EngineResult<SpinResult> {
        if wager == 0 {
            return Err(EngineError::InvalidWager);
        }
        if let Err(err) = self.ledger.debit(user, wager) {
            warn!(user, wager, %err, "spin rejected");
            return Err(err);
        }

        let mut state = self.state.lock();
        let state = &mut *state;
        let draw = draw_outcome(state.source.as_mut(), &state.overrides);
        if draw.is_forced() {
            state.overrides.clear();
        }
        let outcome = draw.outcome();
        let payout = compute_payout(&outcome, wager);
        // read under the round lock so the reported balance includes anything
        // that landed between the debit and this round
        let account = if payout > 0 {
            self.ledger.credit(user, payout)
        } else {
            self.ledger.peek(user)
        };
        let round = state.next_round;
        state.history.push(HistoryEntry { round, outcome });
        state.next_round += 1;

        info!(
            round,
            user,
            wager,
            payout,
            forced = draw.is_forced(),
            balance = account.balance,
            "round resolved"
        );
        Ok(SpinResult {
            round,
            wager,
            outcome,
            payout,
            balance: account.balance,
            cumulative_winnings: account.cumulative_winnings,
            forced: draw.is_forced(),
        })
    }

    /// Current state of `user`'s account. Unseen users read as a fresh account
    /// without one being opened.
    pub fn account(&self, user: &str) -> Account {
        self.ledger.peek(user)
    }

    pub fn accounts(&self) -> Vec<(String, Account)> {
        self.ledger.accounts()
    }

    /// Past rounds, most recent first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().history.snapshot()
    }

    /// Number the next resolved round will receive.
    pub fn current_round(&self) -> u64 {
        self.state.lock().next_round
    }

    pub fn grant(&self, user: &str, amount: u64) -> Account {
        let account = self.ledger.grant(user, amount);
        info!(user, amount, balance = account.balance, "admin grant");
        account
    }

    /// Stages `symbol` at `position`; `None` reverts the slot to random.
    pub fn set_override_slot(&self, position: usize, symbol: Option<Symbol>) -> EngineResult<()> {
        self.state.lock().overrides.set_slot(position, symbol)
    }

    pub fn clear_override(&self) {
        self.state.lock().overrides.clear();
        info!("override cleared");
    }

    pub fn arm_override(&self) -> EngineResult<()> {
        self.state.lock().overrides.arm()
    }

    pub fn override_status(&self) -> OverrideStatus {
        self.state.lock().overrides.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::symbols::SLOTS;

    fn engine_with(script: Vec<usize>) -> RoundEngine {
        let config = EngineConfig {
            players: Vec::new(),
            ..EngineConfig::default()
        };
        RoundEngine::with_source(&config, Box::new(ScriptedSource::new(script))).unwrap()
    }

    fn stage(engine: &RoundEngine, symbols: [Symbol; SLOTS]) {
        for (pos, sym) in symbols.into_iter().enumerate() {
            engine.set_override_slot(pos, Some(sym)).unwrap();
        }
        engine.arm_override().unwrap();
    }

    #[test]
    fn test_rejects_invalid_config() {
        let no_history = EngineConfig {
            history_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(RoundEngine::new(&no_history).is_err());
        let last_round = EngineConfig {
            first_round: u64::MAX,
            ..EngineConfig::default()
        };
        assert!(RoundEngine::new(&last_round).is_err());
    }

    #[test]
    fn test_account_read_does_not_open() {
        let engine = engine_with(vec![0]);
        assert_eq!(engine.account("ghost").balance, 1000);
        assert!(engine.accounts().is_empty());
    }

    #[test]
    fn test_losing_round() {
        let engine = engine_with(vec![0, 1, 2, 3, 4, 5, 6, 0]);
        let res = engine.spin("p", 100).unwrap();
        assert_eq!(res.round, 1);
        assert_eq!(res.payout, 0);
        assert_eq!(res.balance, 900);
        assert!(!res.forced);
        assert_eq!(engine.current_round(), 2);
    }

    #[test]
    fn test_forced_round_clears_override() {
        use Symbol::*;
        let engine = engine_with(vec![0, 1, 2, 3, 4, 5, 6, 0]);
        stage(&engine, [Cherry, Cherry, Cherry, Cherry, Cherry, Apple, Apple, Apple]);
        let res = engine.spin("p", 100).unwrap();
        assert!(res.forced);
        assert_eq!(res.payout, 500);
        assert_eq!(res.balance, 1400);
        assert_eq!(res.cumulative_winnings, 500);
        let status = engine.override_status();
        assert!(!status.armed);
        assert_eq!(status.populated, 0);
    }

    #[test]
    fn test_rejected_spin_touches_nothing() {
        use Symbol::*;
        let engine = engine_with(vec![0]);
        stage(&engine, [Peach; SLOTS]);
        let before = engine.override_status();
        assert_eq!(
            engine.spin("p", 5000),
            Err(EngineError::InsufficientFunds {
                needed: 5000,
                available: 1000
            })
        );
        assert_eq!(engine.spin("p", 0), Err(EngineError::InvalidWager));
        assert_eq!(engine.account("p").balance, 1000);
        assert!(engine.history().is_empty());
        assert_eq!(engine.current_round(), 1);
        assert_eq!(engine.override_status(), before);
    }
}
