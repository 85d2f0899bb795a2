use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Number of slot positions in one outcome.
pub const SLOTS: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Cherry,
    Lemon,
    Grape,
    Apple,
    Watermelon,
    Peach,
    Strawberry,
}

impl Symbol {
    /// The symbol table, in canonical order.
    pub const ALL: [Symbol; 7] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Grape,
        Symbol::Apple,
        Symbol::Watermelon,
        Symbol::Peach,
        Symbol::Strawberry,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Any index maps onto the table; out-of-range indices wrap around.
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % Self::COUNT]
    }

    pub fn to_index(self) -> usize {
        match self {
            Symbol::Cherry => 0,
            Symbol::Lemon => 1,
            Symbol::Grape => 2,
            Symbol::Apple => 3,
            Symbol::Watermelon => 4,
            Symbol::Peach => 5,
            Symbol::Strawberry => 6,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Symbol::Cherry => "cherry",
            Symbol::Lemon => "lemon",
            Symbol::Grape => "grape",
            Symbol::Apple => "apple",
            Symbol::Watermelon => "watermelon",
            Symbol::Peach => "peach",
            Symbol::Strawberry => "strawberry",
        }
    }

    pub fn multiplier(self) -> u64 {
        match self {
            Symbol::Cherry | Symbol::Lemon | Symbol::Grape => 5,
            Symbol::Apple => 10,
            Symbol::Watermelon => 15,
            Symbol::Peach => 25,
            Symbol::Strawberry => 45,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Cherry => "Cherry",
            Symbol::Lemon => "Lemon",
            Symbol::Grape => "Grape",
            Symbol::Apple => "Apple",
            Symbol::Watermelon => "Watermelon",
            Symbol::Peach => "Peach",
            Symbol::Strawberry => "Strawberry",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Grape => "🍇",
            Symbol::Apple => "🍎",
            Symbol::Watermelon => "🍉",
            Symbol::Peach => "🍑",
            Symbol::Strawberry => "🍓",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Symbol {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|sym| sym.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownSymbol(s.to_string()))
    }
}

/// The eight symbols resolved for one round, in slot order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Outcome(pub [Symbol; SLOTS]);

impl Outcome {
    pub fn from_indices(indices: [usize; SLOTS]) -> Self {
        Self(indices.map(Symbol::from_index))
    }

    pub fn symbols(&self) -> &[Symbol; SLOTS] {
        &self.0
    }

    pub fn count_of(&self, symbol: Symbol) -> usize {
        self.0.iter().filter(|s| **s == symbol).count()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sym) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(sym.emoji())?;
        }
        Ok(())
    }
}
