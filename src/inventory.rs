//! Purchasable items and their prices.

use crate::error::{EngineError, Result};
use std::collections::BTreeMap;

/// Price and optional stock level of an item.
///
/// `stock == None` means the item is not stock-tracked and never runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Price in cents. Always positive.
    pub price: u64,

    /// Units left, when tracked.
    pub stock: Option<u32>,
}

impl InventoryEntry {
    /// Returns `true` if a tracked item has no units left.
    pub fn is_sold_out(&self) -> bool {
        self.stock == Some(0)
    }
}

/// Item name to entry. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<String, InventoryEntry>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Inventory::default()
    }

    /// Builds an untracked inventory from `(name, price)` pairs.
    pub fn from_prices<I, S>(prices: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut inventory = Inventory::new();
        for (name, price) in prices {
            inventory.insert(name, price, None)?;
        }
        Ok(inventory)
    }

    /// Adds an item. Zero prices and repeated names are rejected.
    pub fn insert(&mut self, name: impl Into<String>, price: u64, stock: Option<u32>) -> Result<()> {
        let name = name.into();
        if price == 0 {
            return Err(EngineError::InvalidPrice { item: name });
        }
        if self.items.contains_key(&name) {
            return Err(EngineError::DuplicateItem { item: name });
        }
        self.items.insert(name, InventoryEntry { price, stock });
        Ok(())
    }

    /// Looks up an item by name.
    pub fn get(&self, name: &str) -> Option<&InventoryEntry> {
        self.items.get(name)
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over items in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InventoryEntry)> {
        self.items.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Takes one unit of a tracked item. Untracked items are left as is.
    pub(crate) fn take_one(&mut self, name: &str) {
        if let Some(stock) = self.items.get_mut(name).and_then(|e| e.stock.as_mut()) {
            *stock = stock.saturating_sub(1);
        }
    }
}
