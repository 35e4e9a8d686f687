//! Machine setup from CSV files and the environment.
//!
//! Inventory files use the header `item,price,stock` (stock optional),
//! reserve files use `denomination,count`.

use crate::denomination::Denomination;
use crate::error::{EngineError, Result};
use crate::generator::RandomReserveGenerator;
use crate::inventory::Inventory;
use crate::reserve::CashReserve;
use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::Deserialize;
use std::env;
use std::io::Read;

/// Environment variable holding the maximum coins per denomination for a random reserve.
pub const MAX_COINS_ENV: &str = "VENDING_MAX_COINS";

/// Default maximum coins per denomination for a random reserve.
pub const DEFAULT_MAX_COINS: u32 = 20;

#[derive(Debug, Deserialize)]
struct InventoryRecord {
    item: String,
    price: u64,
    #[serde(default)]
    stock: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ReserveRecord {
    denomination: Denomination,
    count: u32,
}

/// Reads an inventory CSV. A malformed row aborts loading.
pub fn load_inventory<R: Read>(reader: R) -> Result<Inventory> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut inventory = Inventory::new();
    for (row_idx, result) in csv_reader.deserialize::<InventoryRecord>().enumerate() {
        let row = row_idx + 2; // 1-indexed, accounting for header row
        let record = result.map_err(|e| EngineError::InvalidRecord {
            row,
            message: e.to_string(),
        })?;
        inventory.insert(record.item, record.price, record.stock)?;
    }

    Ok(inventory)
}

/// Reads a reserve CSV. Repeated denominations are summed.
pub fn load_reserve<R: Read>(reader: R) -> Result<CashReserve> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    let mut reserve = CashReserve::new();
    for (row_idx, result) in csv_reader.deserialize::<ReserveRecord>().enumerate() {
        let row = row_idx + 2;
        let record = result.map_err(|e| EngineError::InvalidRecord {
            row,
            message: e.to_string(),
        })?;
        reserve
            .add_coins(record.denomination, record.count)
            .map_err(|e| EngineError::InvalidRecord {
                row,
                message: e.to_string(),
            })?;
    }

    Ok(reserve)
}

/// Maximum coins per denomination for a random reserve, from the environment.
pub fn max_coins_from_env() -> u32 {
    match env::var(MAX_COINS_ENV) {
        Ok(raw) => match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!(
                    "{}={:?} is not a positive integer, using {}",
                    MAX_COINS_ENV, raw, DEFAULT_MAX_COINS
                );
                DEFAULT_MAX_COINS
            }
        },
        Err(_) => DEFAULT_MAX_COINS,
    }
}

/// Random euro reserve generator configured from the environment.
pub fn random_reserve_generator() -> RandomReserveGenerator<rand::rngs::ThreadRng> {
    RandomReserveGenerator::euro(max_coins_from_env())
}
