//! Coin denominations expressed in integer cents.
//!
//! Coin labels follow the machine's display convention: `10ct` is ten cents,
//! `2eur` is two hundred cents, and a bare integer is read as cents.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Face value of a coin in minor units. Always positive.
///
/// Ordering is by face value, which is what the change algorithm walks.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use vending_machine::Denomination;
///
/// let coin = Denomination::from_str("2eur").unwrap();
/// assert_eq!(coin.cents(), 200);
/// assert_eq!(coin.to_string(), "2eur");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Denomination(NonZeroU32);

impl Denomination {
    /// Cents per euro, used for label parsing and display.
    pub const CENTS_PER_EUR: u32 = 100;

    /// The euro coin set, smallest first.
    pub const EURO_COINS: [u32; 8] = [1, 2, 5, 10, 20, 50, 100, 200];

    /// Creates a denomination, returning `None` for a zero value.
    pub fn new(cents: u32) -> Option<Self> {
        NonZeroU32::new(cents).map(Denomination)
    }

    /// Face value in cents.
    pub fn cents(&self) -> u32 {
        self.0.get()
    }

    /// Face value in cents, widened for amount arithmetic.
    pub fn value(&self) -> u64 {
        u64::from(self.0.get())
    }
}

impl FromStr for Denomination {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidCoin {
            input: s.to_string(),
        };
        let trimmed = s.trim().to_lowercase();

        let (digits, multiplier) = if let Some(eur) = trimmed.strip_suffix("eur") {
            (eur, Self::CENTS_PER_EUR)
        } else if let Some(ct) = trimmed.strip_suffix("ct") {
            (ct, 1)
        } else {
            (trimmed.as_str(), 1)
        };

        let amount: u32 = digits.trim().parse().map_err(|_| invalid())?;
        let cents = amount.checked_mul(multiplier).ok_or_else(invalid)?;
        Denomination::new(cents).ok_or_else(invalid)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.cents();
        if cents % Self::CENTS_PER_EUR == 0 {
            write!(f, "{}eur", cents / Self::CENTS_PER_EUR)
        } else {
            write!(f, "{}ct", cents)
        }
    }
}

impl Serialize for Denomination {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Denomination {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Denomination::from_str(&s).map_err(serde::de::Error::custom)
    }
}
