//! Core vending transaction engine.
//!
//! A purchase validates the request, simulates change against the reserve,
//! and only then commits. Every failure path returns before any state is
//! touched.

use crate::error::PurchaseError;
use crate::generator::ReserveGenerator;
use crate::inventory::Inventory;
use crate::payment::Payment;
use crate::reserve::{CashReserve, Change, ReserveError};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A single vending machine: its inventory and its coin reserve.
///
/// `purchase` is the only way to mutate either; accessors return read-only views.
#[derive(Debug, Clone)]
pub struct VendingMachine {
    inventory: Inventory,
    reserve: CashReserve,
}

impl VendingMachine {
    /// Creates a machine with a concrete starting reserve.
    pub fn new(inventory: Inventory, reserve: CashReserve) -> Self {
        VendingMachine { inventory, reserve }
    }

    /// Creates a machine whose starting reserve comes from a generator.
    pub fn with_generator<G: ReserveGenerator + ?Sized>(
        inventory: Inventory,
        generator: &mut G,
    ) -> Self {
        VendingMachine::new(inventory, generator.generate())
    }

    /// Current inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Current coin reserve.
    pub fn reserve(&self) -> &CashReserve {
        &self.reserve
    }

    /// Attempts to buy `item` with `payment`.
    ///
    /// On success the payment is credited, the change debited, and one unit of
    /// a stock-tracked item taken. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// - [`PurchaseError::ItemNotAvailable`] if the item is unknown
    /// - [`PurchaseError::OutOfStock`] if a tracked item has no units left
    /// - [`PurchaseError::InsufficientPayment`] if the coins are worth less than the price
    /// - [`PurchaseError::CannotProvideChange`] if the reserve cannot pay the
    ///   difference exactly
    /// - [`PurchaseError::CoinStorageFull`] if a tendered coin's count would overflow
    pub fn purchase(&mut self, item: &str, payment: &Payment) -> Result<Change, PurchaseError> {
        let result = self.try_purchase(item, payment);
        match &result {
            Ok(change) => debug!(
                "Dispensed {} for {}ct, change [{}]",
                item,
                payment.total(),
                change
            ),
            Err(e) => debug!("Rejected purchase of {}: {}", item, e),
        }
        result
    }

    fn try_purchase(&mut self, item: &str, payment: &Payment) -> Result<Change, PurchaseError> {
        let entry = self
            .inventory
            .get(item)
            .ok_or_else(|| PurchaseError::ItemNotAvailable {
                item: item.to_string(),
            })?;

        if entry.is_sold_out() {
            return Err(PurchaseError::OutOfStock {
                item: item.to_string(),
            });
        }

        let price = entry.price;
        let paid = payment.total();
        if paid < price {
            return Err(PurchaseError::InsufficientPayment { price, paid });
        }

        let amount = paid - price;
        let change = self
            .reserve
            .try_compute_change(amount)
            .ok_or(PurchaseError::CannotProvideChange { amount })?;

        self.reserve
            .apply_transaction(payment, &change)
            .map_err(|e| match e {
                // unreachable after a successful simulation on this reserve
                ReserveError::Shortfall { .. } => PurchaseError::CannotProvideChange { amount },
                ReserveError::Overflow { denomination, .. } => {
                    PurchaseError::CoinStorageFull { denomination }
                }
            })?;
        self.inventory.take_one(item);

        Ok(change)
    }
}

/// A vending machine that can be shared between threads.
///
/// Each `purchase` holds the lock from validation through commit, so no other
/// caller observes the reserve between the change simulation and the commit.
#[derive(Debug, Clone)]
pub struct SharedVendingMachine {
    inner: Arc<Mutex<VendingMachine>>,
}

impl SharedVendingMachine {
    /// Wraps a machine for shared use.
    pub fn new(machine: VendingMachine) -> Self {
        SharedVendingMachine {
            inner: Arc::new(Mutex::new(machine)),
        }
    }

    /// Purchases under the machine lock. See [`VendingMachine::purchase`].
    pub fn purchase(&self, item: &str, payment: &Payment) -> Result<Change, PurchaseError> {
        self.lock().purchase(item, payment)
    }

    /// Copy of the current inventory.
    pub fn inventory(&self) -> Inventory {
        self.lock().inventory().clone()
    }

    /// Copy of the current reserve.
    pub fn reserve(&self) -> CashReserve {
        self.lock().reserve().clone()
    }

    // A purchase never leaves state half applied, so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, VendingMachine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<VendingMachine> for SharedVendingMachine {
    fn from(machine: VendingMachine) -> Self {
        SharedVendingMachine::new(machine)
    }
}
