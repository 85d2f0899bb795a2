use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::symbols::{Outcome, Symbol, SLOTS};

/// Operator-staged outcome for the next round.
///
/// `armed` only ever holds while all eight slots are populated. Clearing any slot
/// of an armed buffer disarms it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideBuffer {
    slots: [Option<Symbol>; SLOTS],
    armed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverrideStatus {
    pub slots: [Option<Symbol>; SLOTS],
    pub populated: usize,
    pub armed: bool,
}

impl OverrideBuffer {
    pub fn set_slot(&mut self, position: usize, symbol: Option<Symbol>) -> EngineResult<()> {
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(EngineError::SlotOutOfRange(position))?;
        *slot = symbol;
        if symbol.is_none() {
            self.armed = false;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn arm(&mut self) -> EngineResult<()> {
        let populated = self.populated();
        if populated < SLOTS {
            return Err(EngineError::IncompleteSelection { populated });
        }
        self.armed = true;
        info!("override armed");
        Ok(())
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// The staged outcome, if the buffer is armed.
    pub fn forced_outcome(&self) -> Option<Outcome> {
        if !self.armed {
            return None;
        }
        let mut symbols = [Symbol::Cherry; SLOTS];
        for (dst, src) in symbols.iter_mut().zip(self.slots.iter()) {
            *dst = (*src)?;
        }
        Some(Outcome(symbols))
    }

    pub fn status(&self) -> OverrideStatus {
        OverrideStatus {
            slots: self.slots,
            populated: self.populated(),
            armed: self.armed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> OverrideBuffer {
        let mut buf = OverrideBuffer::default();
        for pos in 0..SLOTS {
            buf.set_slot(pos, Some(Symbol::from_index(pos))).unwrap();
        }
        buf
    }

    #[test]
    fn test_arm_requires_all_slots() {
        let mut buf = OverrideBuffer::default();
        buf.set_slot(0, Some(Symbol::Cherry)).unwrap();
        assert_eq!(
            buf.arm(),
            Err(EngineError::IncompleteSelection { populated: 1 })
        );
        assert!(!buf.is_armed());
        assert!(buf.forced_outcome().is_none());
    }

    #[test]
    fn test_armed_outcome_in_slot_order() {
        let mut buf = filled();
        buf.arm().unwrap();
        let outcome = buf.forced_outcome().unwrap();
        assert_eq!(outcome, Outcome::from_indices([0, 1, 2, 3, 4, 5, 6, 7]));
        // re-arming a full buffer is fine
        buf.arm().unwrap();
    }

    #[test]
    fn test_clearing_a_slot_disarms() {
        let mut buf = filled();
        buf.arm().unwrap();
        buf.set_slot(3, Some(Symbol::Peach)).unwrap();
        assert!(buf.is_armed());
        buf.set_slot(3, None).unwrap();
        assert!(!buf.is_armed());
        assert_eq!(buf.status().populated, 7);
    }

    #[test]
    fn test_out_of_range_leaves_buffer() {
        let mut buf = filled();
        let before = buf.clone();
        assert_eq!(
            buf.set_slot(8, Some(Symbol::Cherry)),
            Err(EngineError::SlotOutOfRange(8))
        );
        assert_eq!(buf, before);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut buf = filled();
        buf.arm().unwrap();
        buf.clear();
        assert_eq!(buf, OverrideBuffer::default());
        assert_eq!(buf.status().populated, 0);
    }
}
