use tracing::debug;

use crate::{
    override_buffer::OverrideBuffer,
    rng::SymbolSource,
    symbols::{Outcome, Symbol, SLOTS},
};

/// Result of one draw, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    Random(Outcome),
    /// Taken from the override buffer; the caller must clear the buffer.
    Forced(Outcome),
}

impl Draw {
    pub fn outcome(&self) -> Outcome {
        match self {
            Draw::Random(outcome) | Draw::Forced(outcome) => *outcome,
        }
    }

    pub fn is_forced(&self) -> bool {
        matches!(self, Draw::Forced(_))
    }
}

pub fn draw_random(source: &mut dyn SymbolSource) -> Outcome {
    // Independent draw per slot, so symbols repeat freely across positions
    let mut indices = [0usize; SLOTS];
    for idx in indices.iter_mut() {
        *idx = source.next_index(Symbol::COUNT);
    }
    Outcome::from_indices(indices)
}

/// Draws the next outcome. An armed override wins and no randomness is consumed.
pub fn draw_outcome(source: &mut dyn SymbolSource, overrides: &OverrideBuffer) -> Draw {
    let draw = match overrides.forced_outcome() {
        Some(outcome) => Draw::Forced(outcome),
        None => Draw::Random(draw_random(source)),
    };
    debug!(outcome = %draw.outcome(), forced = draw.is_forced(), "drew outcome");
    draw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedSource, SeededSource};

    #[test]
    fn test_draw_deterministic() {
        let buffer = OverrideBuffer::default();
        let out1 = draw_outcome(&mut SeededSource::new(1), &buffer);
        let out2 = draw_outcome(&mut SeededSource::new(1), &buffer);
        assert_eq!(out1, out2);
        assert!(!out1.is_forced());
    }

    #[test]
    fn test_raw_indices_wrap() {
        let mut src = ScriptedSource::new(vec![7, 8, 9, 10, 11, 12, 13, 14]);
        let outcome = draw_random(&mut src);
        assert_eq!(outcome, Outcome::from_indices([0, 1, 2, 3, 4, 5, 6, 0]));
    }

    #[test]
    fn test_armed_override_bypasses_source() {
        let mut buffer = OverrideBuffer::default();
        for pos in 0..SLOTS {
            buffer.set_slot(pos, Some(Symbol::Peach)).unwrap();
        }
        buffer.arm().unwrap();
        let mut src = ScriptedSource::new(vec![0]);
        let draw = draw_outcome(&mut src, &buffer);
        assert_eq!(draw, Draw::Forced(Outcome([Symbol::Peach; SLOTS])));
        // source untouched: next random draw still starts at the script head
        assert_eq!(draw_random(&mut src), Outcome([Symbol::Cherry; SLOTS]));
    }

    #[test]
    fn test_unarmed_full_buffer_is_ignored() {
        let mut buffer = OverrideBuffer::default();
        for pos in 0..SLOTS {
            buffer.set_slot(pos, Some(Symbol::Peach)).unwrap();
        }
        let draw = draw_outcome(&mut ScriptedSource::new(vec![3]), &buffer);
        assert_eq!(draw, Draw::Random(Outcome([Symbol::Apple; SLOTS])));
    }
}
