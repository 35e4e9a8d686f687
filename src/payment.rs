//! Coins tendered for a purchase.

use crate::denomination::Denomination;
use crate::error::{EngineError, Result};
use std::str::FromStr;

/// Upper bound on the number of coins a single parsed request may carry.
pub const MAX_COINS_PER_REQUEST: usize = 1000;

/// Multiset of coins supplied for one purchase attempt. Order is irrelevant.
///
/// Coins need not match any denomination held by the reserve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payment {
    coins: Vec<Denomination>,
}

impl Payment {
    /// Creates a payment from individual coins.
    pub fn new(coins: Vec<Denomination>) -> Self {
        Payment { coins }
    }

    /// Builds a payment from raw cent values, rejecting zero-valued coins.
    pub fn from_cents(values: &[u32]) -> Result<Self> {
        values
            .iter()
            .map(|&v| {
                Denomination::new(v).ok_or_else(|| EngineError::InvalidCoin {
                    input: v.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Payment::new)
    }

    /// The tendered coins.
    pub fn coins(&self) -> &[Denomination] {
        &self.coins
    }

    /// Total tendered value in cents.
    pub fn total(&self) -> u64 {
        self.coins.iter().map(Denomination::value).sum()
    }

    /// Returns `true` if no coins were tendered.
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

impl FromIterator<Denomination> for Payment {
    fn from_iter<I: IntoIterator<Item = Denomination>>(iter: I) -> Self {
        Payment::new(iter.into_iter().collect())
    }
}

/// Parses a coin list such as `1 x 1eur, 5 x 10ct`.
///
/// Groups are comma separated; a group without a `N x` prefix is one coin.
/// An empty string is an empty payment. More than [`MAX_COINS_PER_REQUEST`]
/// coins in total is rejected.
impl FromStr for Payment {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut coins = Vec::new();

        for group in s.split(',').map(str::trim).filter(|g| !g.is_empty()) {
            let invalid = || EngineError::InvalidCoin {
                input: group.to_string(),
            };
            let lower = group.to_lowercase();
            let (quantity, label) = match lower.split_once('x') {
                Some((qty, label)) if !qty.trim().is_empty() => {
                    let qty: usize = qty.trim().parse().map_err(|_| invalid())?;
                    (qty, label)
                }
                _ => (1, lower.as_str()),
            };

            if quantity > MAX_COINS_PER_REQUEST - coins.len() {
                return Err(invalid());
            }

            let coin = Denomination::from_str(label).map_err(|_| invalid())?;
            coins.extend(std::iter::repeat(coin).take(quantity));
        }

        Ok(Payment::new(coins))
    }
}
