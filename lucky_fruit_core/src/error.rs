use crate::symbols::SLOTS;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("insufficient funds: wager {needed} exceeds balance {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("incomplete selection: {populated}/{slots} slots populated", slots = SLOTS)]
    IncompleteSelection { populated: usize },
    #[error("wager must be positive")]
    InvalidWager,
    #[error("slot position {0} out of range (0..{slots})", slots = SLOTS)]
    SlotOutOfRange(usize),
    #[error("unknown symbol id: {0}")]
    UnknownSymbol(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            EngineError::SlotOutOfRange(9).to_string(),
            "slot position 9 out of range (0..8)"
        );
        assert_eq!(
            EngineError::IncompleteSelection { populated: 3 }.to_string(),
            "incomplete selection: 3/8 slots populated"
        );
    }
}
