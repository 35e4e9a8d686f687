//! Error types for the vending machine.

use crate::denomination::Denomination;
use thiserror::Error;

/// Result type alias for configuration and batch operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Reasons a single purchase attempt is rejected.
///
/// Every variant is terminal for the attempt and leaves the machine untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    /// The requested item is not in the inventory
    #[error("Item not available: {item}")]
    ItemNotAvailable { item: String },

    /// The item is tracked and its stock is exhausted
    #[error("Out of stock: {item}")]
    OutOfStock { item: String },

    /// Tendered coins are worth less than the price
    #[error("Insufficient payment: paid {paid}ct, price {price}ct")]
    InsufficientPayment { price: u64, paid: u64 },

    /// The reserve cannot represent the change exactly
    #[error("Cannot provide change of {amount}ct")]
    CannotProvideChange { amount: u64 },

    /// The reserve cannot hold another coin of a tendered denomination
    #[error("Coin storage full for {denomination}")]
    CoinStorageFull { denomination: Denomination },
}

impl PurchaseError {
    /// Stable snake-case identifier of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PurchaseError::ItemNotAvailable { .. } => "item_not_available",
            PurchaseError::OutOfStock { .. } => "out_of_stock",
            PurchaseError::InsufficientPayment { .. } => "insufficient_payment",
            PurchaseError::CannotProvideChange { .. } => "cannot_provide_change",
            PurchaseError::CoinStorageFull { .. } => "coin_storage_full",
        }
    }
}

/// Errors raised while setting up a machine or streaming requests through it.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Item price must be positive
    #[error("Item {item} must have a positive price")]
    InvalidPrice { item: String },

    /// Item listed twice in the inventory
    #[error("Duplicate item {item}")]
    DuplicateItem { item: String },

    /// Coin label or coin list could not be parsed
    #[error("Invalid coin specification: {input:?}")]
    InvalidCoin { input: String },

    /// Missing input file argument
    #[error(
        "Missing input file argument. Usage: vending-machine <inventory.csv> <purchases.csv> [reserve.csv]"
    )]
    MissingArgument,
}
