use chrono::{DateTime, Utc};
use lucky_fruit_core::{Account, EngineError, HistoryEntry, OverrideStatus, SpinResult, Symbol};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinRequest {
    pub user: String,
    pub wager: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SpinResponse {
    pub round: u64,
    pub outcome: Vec<Symbol>,
    pub wager: u64,
    pub payout: u64,
    pub balance: u64,
    pub cumulative_winnings: u64,
    pub forced: bool,
}

impl From<SpinResult> for SpinResponse {
    fn from(res: SpinResult) -> Self {
        Self {
            round: res.round,
            outcome: res.outcome.symbols().to_vec(),
            wager: res.wager,
            payout: res.payout,
            balance: res.balance,
            cumulative_winnings: res.cumulative_winnings,
            forced: res.forced,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub user: String,
    pub balance: u64,
    pub cumulative_winnings: u64,
}

impl AccountView {
    pub fn new(user: impl Into<String>, account: Account) -> Self {
        Self {
            user: user.into(),
            balance: account.balance,
            cumulative_winnings: account.cumulative_winnings,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub round: u64,
    pub outcome: Vec<Symbol>,
}

impl From<HistoryEntry> for HistoryItem {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            round: entry.round,
            outcome: entry.outcome.symbols().to_vec(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryResponse {
    pub current_round: u64,
    pub as_of: DateTime<Utc>,
    /// Most recent first.
    pub entries: Vec<HistoryItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminGrantRequest {
    pub user: String,
    pub amount: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminSetSlotRequest {
    pub position: usize,
    /// Symbol id; `None` returns the slot to random.
    pub symbol: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OverrideStatusResponse {
    pub slots: Vec<Option<Symbol>>,
    pub populated: usize,
    pub armed: bool,
}

impl From<OverrideStatus> for OverrideStatusResponse {
    fn from(status: OverrideStatus) -> Self {
        Self {
            slots: status.slots.to_vec(),
            populated: status.populated,
            armed: status.armed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("unauthorized")]
    Unauthorized,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Invalid(_) => 400,
            ApiError::Unauthorized => 401,
            ApiError::Engine(EngineError::InsufficientFunds { .. }) => 402,
            ApiError::Engine(EngineError::IncompleteSelection { .. }) => 409,
            ApiError::Engine(_) => 400,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Invalid(_) => "invalid_request",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Engine(EngineError::InsufficientFunds { .. }) => "insufficient_funds",
            ApiError::Engine(EngineError::IncompleteSelection { .. }) => "incomplete_selection",
            ApiError::Engine(EngineError::InvalidWager) => "invalid_wager",
            ApiError::Engine(EngineError::SlotOutOfRange(_)) => "slot_out_of_range",
            ApiError::Engine(EngineError::UnknownSymbol(_)) => "unknown_symbol",
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
