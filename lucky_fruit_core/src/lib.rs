pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod ledger;
pub mod override_buffer;
pub mod paytable;
pub mod resolver;
pub mod rng;
pub mod symbols;

pub use crate::config::{EngineConfig, SeedAccount};
pub use crate::engine::{draw_outcome, draw_random, Draw};
pub use crate::error::{ConfigError, EngineError, EngineResult};
pub use crate::history::{History, HistoryEntry, DEFAULT_HISTORY_CAPACITY};
pub use crate::ledger::{Account, Ledger};
pub use crate::override_buffer::{OverrideBuffer, OverrideStatus};
pub use crate::paytable::{compute_payout, MATCH_THRESHOLD};
pub use crate::resolver::{RoundEngine, SpinResult};
pub use crate::rng::{source_from_seed, EntropySource, ScriptedSource, SeededSource, SymbolSource};
pub use crate::symbols::{Outcome, Symbol, SLOTS};
