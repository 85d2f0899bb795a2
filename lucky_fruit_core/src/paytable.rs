use crate::symbols::{Outcome, Symbol};

/// Minimum number of identical symbols that pays.
pub const MATCH_THRESHOLD: usize = 5;

/// Payout for `outcome` at `wager`.
///
/// Every symbol appearing at least five times pays `wager * multiplier * count / 5`,
/// so six of a kind pays 6/5 of the five-of-a-kind amount. Qualifying symbols are
/// summed before the single division, and any remainder below one unit is dropped.
pub fn compute_payout(outcome: &Outcome, wager: u64) -> u64 {
    let mut numerator: u128 = 0;
    for sym in Symbol::ALL {
        let count = outcome.count_of(sym);
        if count >= MATCH_THRESHOLD {
            numerator += wager as u128 * sym.multiplier() as u128 * count as u128;
        }
    }
    let total = numerator / MATCH_THRESHOLD as u128;
    u64::try_from(total).unwrap_or(u64::MAX)
}
