//! Coin reserve ledger and change computation.
//!
//! Counts are unsigned and all count arithmetic is checked before the
//! reserve is touched, so a count can neither go negative nor wrap.

use crate::denomination::Denomination;
use crate::payment::Payment;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Coins returned to the payer, keyed by denomination.
///
/// Only positive counts are stored. An empty `Change` means exact payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Change {
    coins: BTreeMap<Denomination, u32>,
}

impl Change {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Change::default()
    }

    /// Adds `count` coins of `denomination`. Zero counts are ignored.
    fn add(&mut self, denomination: Denomination, count: u32) {
        if count > 0 {
            *self.coins.entry(denomination).or_insert(0) += count;
        }
    }

    /// Returns `true` when no coins are returned.
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Number of coins of the given denomination.
    pub fn count(&self, denomination: Denomination) -> u32 {
        self.coins.get(&denomination).copied().unwrap_or(0)
    }

    /// Total number of coins returned.
    pub fn coin_count(&self) -> u64 {
        self.coins.values().map(|&c| u64::from(c)).sum()
    }

    /// Total value in cents.
    pub fn total(&self) -> u64 {
        self.coins
            .iter()
            .map(|(d, &c)| d.value() * u64::from(c))
            .sum()
    }

    /// Iterates over `(denomination, count)`, largest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.coins.iter().rev().map(|(&d, &c)| (d, c))
    }
}

impl FromIterator<(Denomination, u32)> for Change {
    fn from_iter<I: IntoIterator<Item = (Denomination, u32)>>(iter: I) -> Self {
        let mut change = Change::new();
        for (denomination, count) in iter {
            change.add(denomination, count);
        }
        change
    }
}

/// Formats as `5 x 10ct and 1 x 1eur`, largest first. Empty change is empty text.
impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (denomination, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{} x {}", count, denomination)?;
        }
        Ok(())
    }
}

/// A reserve mutation that would leave a count out of range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReserveError {
    #[error("Reserve holds {available} x {denomination}, cannot dispense {requested}")]
    Shortfall {
        denomination: Denomination,
        requested: u32,
        available: u32,
    },

    #[error("Reserve holds {held} x {denomination}, cannot accept {added} more")]
    Overflow {
        denomination: Denomination,
        held: u32,
        added: u32,
    },
}

fn credit(
    coins: &mut BTreeMap<Denomination, u32>,
    denomination: Denomination,
    added: u32,
) -> std::result::Result<(), ReserveError> {
    let slot = coins.entry(denomination).or_insert(0);
    *slot = slot.checked_add(added).ok_or(ReserveError::Overflow {
        denomination,
        held: *slot,
        added,
    })?;
    Ok(())
}

/// The machine's coin reserve: denomination to count.
///
/// # Invariants
///
/// - Every count is non-negative and fits a `u32` (enforced by the unsigned
///   type plus checked arithmetic in every mutation)
/// - A failed [`CashReserve::apply_transaction`] leaves the reserve unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashReserve {
    coins: BTreeMap<Denomination, u32>,
}

impl CashReserve {
    /// Creates an empty reserve.
    pub fn new() -> Self {
        CashReserve::default()
    }

    /// Number of coins held for a denomination. Unknown denominations hold zero.
    pub fn count(&self, denomination: Denomination) -> u32 {
        self.coins.get(&denomination).copied().unwrap_or(0)
    }

    /// Total value of the reserve in cents.
    pub fn total_value(&self) -> u64 {
        self.coins
            .iter()
            .map(|(d, &c)| d.value() * u64::from(c))
            .sum()
    }

    /// Returns `true` if the reserve holds no denominations at all.
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Iterates over `(denomination, count)`, smallest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.coins.iter().map(|(&d, &c)| (d, c))
    }

    /// Denominations held by the reserve, largest face value first.
    ///
    /// This ordering is the only tie-break the change algorithm uses.
    pub fn available_denominations_descending(&self) -> Vec<Denomination> {
        self.coins.keys().rev().copied().collect()
    }

    /// Simulates a greedy withdrawal of `amount` cents without mutating the reserve.
    ///
    /// Walks denominations largest to smallest, taking
    /// `min(available, remaining / denomination)` coins of each. Returns `None`
    /// when the remainder cannot reach exactly zero.
    ///
    /// Greedy is not optimal for every coin set: with `{25: 1, 10: 3}` an
    /// amount of 30 fails because the quarter is taken first, although three
    /// dimes would pay it.
    pub fn try_compute_change(&self, amount: u64) -> Option<Change> {
        let mut remaining = amount;
        let mut change = Change::new();

        for denomination in self.available_denominations_descending() {
            if remaining == 0 {
                break;
            }
            let available = u64::from(self.count(denomination));
            let count = available.min(remaining / denomination.value());
            if count > 0 {
                remaining -= count * denomination.value();
                // count <= available, which came from a u32
                change.add(denomination, count as u32);
            }
        }

        if remaining == 0 {
            Some(change)
        } else {
            None
        }
    }

    /// Adds `count` coins of `denomination`, failing if the count would overflow.
    pub(crate) fn add_coins(
        &mut self,
        denomination: Denomination,
        count: u32,
    ) -> std::result::Result<(), ReserveError> {
        credit(&mut self.coins, denomination, count)
    }

    /// Credits every received coin and debits every dispensed coin as one step.
    ///
    /// Credits and debits are applied to a copy that replaces the reserve only
    /// once every step has succeeded; on error nothing is modified.
    pub(crate) fn apply_transaction(
        &mut self,
        received: &Payment,
        dispensed: &Change,
    ) -> std::result::Result<(), ReserveError> {
        let mut next = self.coins.clone();

        for coin in received.coins() {
            credit(&mut next, *coin, 1)?;
        }

        for (denomination, requested) in dispensed.iter() {
            let slot = next.entry(denomination).or_insert(0);
            if *slot < requested {
                return Err(ReserveError::Shortfall {
                    denomination,
                    requested,
                    available: *slot,
                });
            }
            *slot -= requested;
        }

        self.coins = next;
        Ok(())
    }
}

impl FromIterator<(Denomination, u32)> for CashReserve {
    /// Builds a reserve, summing counts of repeated denominations.
    ///
    /// Sums saturate at `u32::MAX`; use [`crate::config::load_reserve`] to
    /// reject such input instead.
    fn from_iter<I: IntoIterator<Item = (Denomination, u32)>>(iter: I) -> Self {
        let mut coins = BTreeMap::new();
        for (denomination, count) in iter {
            let slot: &mut u32 = coins.entry(denomination).or_insert(0);
            *slot = slot.saturating_add(count);
        }
        CashReserve { coins }
    }
}

impl fmt::Display for CashReserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (denomination, count)) in self.coins.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} x {}", count, denomination)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(cents: u32) -> Denomination {
        Denomination::new(cents).unwrap()
    }

    fn reserve(entries: &[(u32, u32)]) -> CashReserve {
        entries.iter().map(|&(d, c)| (coin(d), c)).collect()
    }

    fn payment(coins: &[u32]) -> Payment {
        coins.iter().map(|&c| coin(c)).collect()
    }

    #[test]
    fn test_denominations_descending() {
        let r = reserve(&[(10, 50), (1, 100), (5, 50)]);
        assert_eq!(
            r.available_denominations_descending(),
            vec![coin(10), coin(5), coin(1)]
        );
    }

    #[test]
    fn test_zero_amount_is_empty_change() {
        let r = reserve(&[(10, 1)]);
        assert_eq!(r.try_compute_change(0), Some(Change::new()));
        assert_eq!(CashReserve::new().try_compute_change(0), Some(Change::new()));
    }

    #[test]
    fn test_greedy_prefers_largest() {
        let r = reserve(&[(10, 50), (1, 100), (5, 50)]);
        let change = r.try_compute_change(50).unwrap();
        assert_eq!(change.count(coin(10)), 5);
        assert_eq!(change.coin_count(), 5);
        assert_eq!(change.total(), 50);
    }

    #[test]
    fn test_greedy_falls_through_when_counts_run_out() {
        let r = reserve(&[(10, 2), (5, 1), (1, 10)]);
        let change = r.try_compute_change(28).unwrap();
        assert_eq!(change.count(coin(10)), 2);
        assert_eq!(change.count(coin(5)), 1);
        assert_eq!(change.count(coin(1)), 3);
    }

    #[test]
    fn test_unpayable_amount() {
        let r = reserve(&[(100, 1)]);
        assert_eq!(r.try_compute_change(50), None);
    }

    #[test]
    fn test_greedy_limitation_is_reported_as_failure() {
        let r = reserve(&[(25, 1), (10, 3)]);
        assert_eq!(r.try_compute_change(30), None);
    }

    #[test]
    fn test_simulation_does_not_mutate() {
        let r = reserve(&[(10, 5)]);
        let before = r.clone();
        let _ = r.try_compute_change(30);
        assert_eq!(r, before);
    }

    #[test]
    fn test_apply_transaction_credits_and_debits() {
        let mut r = reserve(&[(10, 50), (1, 100), (5, 50)]);
        let change = r.try_compute_change(50).unwrap();
        r.apply_transaction(&payment(&[100, 100]), &change).unwrap();

        assert_eq!(r.count(coin(100)), 2);
        assert_eq!(r.count(coin(10)), 45);
        assert_eq!(r.count(coin(5)), 50);
    }

    #[test]
    fn test_apply_transaction_shortfall_leaves_reserve_untouched() {
        let mut r = reserve(&[(10, 1)]);
        let before = r.clone();
        let change: Change = [(coin(10), 2)].into_iter().collect();

        let err = r.apply_transaction(&payment(&[50]), &change).unwrap_err();
        assert_eq!(
            err,
            ReserveError::Shortfall {
                denomination: coin(10),
                requested: 2,
                available: 1,
            }
        );
        assert_eq!(r, before);
    }

    #[test]
    fn test_apply_transaction_overflow_leaves_reserve_untouched() {
        let mut r = reserve(&[(100, u32::MAX), (10, 3)]);
        let before = r.clone();
        let change: Change = [(coin(10), 1)].into_iter().collect();

        let err = r.apply_transaction(&payment(&[100]), &change).unwrap_err();
        assert_eq!(
            err,
            ReserveError::Overflow {
                denomination: coin(100),
                held: u32::MAX,
                added: 1,
            }
        );
        assert_eq!(r, before);
    }

    #[test]
    fn test_add_coins_is_checked() {
        let mut r = reserve(&[(10, u32::MAX - 1)]);
        r.add_coins(coin(10), 1).unwrap();
        assert_eq!(r.count(coin(10)), u32::MAX);

        assert!(matches!(
            r.add_coins(coin(10), 1),
            Err(ReserveError::Overflow { .. })
        ));
        assert_eq!(r.count(coin(10)), u32::MAX);
    }

    #[test]
    fn test_from_iter_saturates() {
        let r = reserve(&[(10, u32::MAX), (10, 1)]);
        assert_eq!(r.count(coin(10)), u32::MAX);
    }

    #[test]
    fn test_received_coins_can_fund_their_own_change() {
        let mut r = CashReserve::new();
        let change: Change = [(coin(10), 1)].into_iter().collect();
        r.apply_transaction(&payment(&[10, 20]), &change).unwrap();
        assert_eq!(r.count(coin(10)), 0);
        assert_eq!(r.count(coin(20)), 1);
    }

    #[test]
    fn test_change_display() {
        let change: Change = [(coin(10), 5), (coin(100), 1)].into_iter().collect();
        assert_eq!(change.to_string(), "1 x 1eur and 5 x 10ct");
        assert_eq!(Change::new().to_string(), "");
    }

    #[test]
    fn test_from_iter_sums_duplicates() {
        let r = reserve(&[(5, 2), (5, 3)]);
        assert_eq!(r.count(coin(5)), 5);
        assert_eq!(r.total_value(), 25);
    }
}
