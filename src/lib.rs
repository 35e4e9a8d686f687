//! # Vending Machine
//!
//! A coin-operated vending machine simulator: an inventory of priced items,
//! a reserve of coins, and a transaction engine that dispenses an item with
//! exact change or rejects the purchase without side effects.
//!
//! ## Design Principles
//!
//! - **Integer cents**: all values are minor units, coins are non-zero
//! - **Simulate, then commit**: change is computed against the reserve before
//!   anything is credited or debited
//! - **Typed failures**: every rejection is a [`PurchaseError`] variant
//! - **Greedy change**: largest denomination first, exact or not at all
//!
//! ## Example
//!
//! ```
//! use vending_machine::{CashReserve, Denomination, Inventory, Payment, VendingMachine};
//!
//! let inventory = Inventory::from_prices([("Soda", 150)]).unwrap();
//! let reserve: CashReserve = [(Denomination::new(10).unwrap(), 50)].into_iter().collect();
//! let mut machine = VendingMachine::new(inventory, reserve);
//!
//! let change = machine
//!     .purchase("Soda", &Payment::from_cents(&[100, 100]).unwrap())
//!     .unwrap();
//! assert_eq!(change.to_string(), "5 x 10ct");
//! ```

pub mod batch;
pub mod config;
pub mod denomination;
pub mod engine;
pub mod error;
pub mod generator;
pub mod inventory;
pub mod payment;
pub mod reserve;

pub use batch::{PurchaseOutcome, PurchaseRecord, PurchaseRequest};
pub use denomination::Denomination;
pub use engine::{SharedVendingMachine, VendingMachine};
pub use error::{EngineError, PurchaseError, Result};
pub use generator::{RandomReserveGenerator, ReserveGenerator};
pub use inventory::{Inventory, InventoryEntry};
pub use payment::Payment;
pub use reserve::{CashReserve, Change};
