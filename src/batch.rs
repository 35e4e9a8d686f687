//! Streaming purchase requests through a machine.
//!
//! Requests are read from CSV (`item,coins`) one at a time and each outcome
//! is written as a CSV row (`item,paid,status,change`).

use crate::engine::VendingMachine;
use crate::error::{PurchaseError, Result};
use crate::payment::Payment;
use crate::reserve::Change;
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use serde::Deserialize;
use std::io::{Read, Write};
use std::str::FromStr;

/// Raw purchase request as read from CSV.
#[derive(Debug, Deserialize)]
pub struct PurchaseRecord {
    /// Item name
    pub item: String,

    /// Coin list, e.g. `1 x 1eur, 5 x 10ct`
    #[serde(default)]
    pub coins: String,
}

impl PurchaseRecord {
    /// Parses the coin list into a typed request.
    ///
    /// Returns `None` if the item is blank or the coin list is malformed.
    pub fn parse(&self) -> Option<PurchaseRequest> {
        let item = self.item.trim();
        if item.is_empty() {
            return None;
        }
        let payment = Payment::from_str(&self.coins).ok()?;
        Some(PurchaseRequest {
            item: item.to_string(),
            payment,
        })
    }
}

/// A validated purchase request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub item: String,
    pub payment: Payment,
}

/// Result of one processed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub item: String,
    pub paid: u64,
    pub result: std::result::Result<Change, PurchaseError>,
}

impl PurchaseOutcome {
    /// `dispensed` on success, otherwise the failure kind.
    pub fn status(&self) -> &'static str {
        match &self.result {
            Ok(_) => "dispensed",
            Err(e) => e.kind(),
        }
    }
}

/// Runs every request in `reader` against `machine`, in order.
///
/// Malformed rows are logged at warn level and skipped.
pub fn process_csv<R: Read>(machine: &mut VendingMachine, reader: R) -> Result<Vec<PurchaseOutcome>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut outcomes = Vec::new();
    for (row_idx, result) in csv_reader.deserialize::<PurchaseRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        match result {
            Ok(record) => {
                if let Some(request) = record.parse() {
                    let result = machine.purchase(&request.item, &request.payment);
                    outcomes.push(PurchaseOutcome {
                        item: request.item,
                        paid: request.payment.total(),
                        result,
                    });
                } else {
                    warn!("Row {}: Failed to parse purchase request", row_num);
                }
            }
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
            }
        }
    }

    info!("Reserve after {} purchases: {}", outcomes.len(), machine.reserve());
    for (item, entry) in machine.inventory().iter() {
        if let Some(stock) = entry.stock {
            debug!("Stock left for {}: {}", item, stock);
        }
    }
    Ok(outcomes)
}

/// Writes outcomes as CSV in processing order.
pub fn write_output<W: Write>(outcomes: &[PurchaseOutcome], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["item", "paid", "status", "change"])?;

    for outcome in outcomes {
        let change = match &outcome.result {
            Ok(change) => change.to_string(),
            Err(_) => String::new(),
        };
        csv_writer.write_record([
            outcome.item.as_str(),
            outcome.paid.to_string().as_str(),
            outcome.status(),
            change.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denomination::Denomination;
    use crate::inventory::Inventory;
    use crate::reserve::CashReserve;
    use std::io::Cursor;

    fn machine() -> VendingMachine {
        let inventory = Inventory::from_prices([("Water", 100), ("Soda", 150)]).unwrap();
        let reserve: CashReserve = [(1, 100), (5, 50), (10, 50)]
            .into_iter()
            .map(|(d, c)| (Denomination::new(d).unwrap(), c))
            .collect();
        VendingMachine::new(inventory, reserve)
    }

    fn run(csv: &str) -> String {
        let mut m = machine();
        let outcomes = process_csv(&mut m, Cursor::new(csv)).unwrap();
        let mut output = Vec::new();
        write_output(&outcomes, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_record_parse() {
        let record = PurchaseRecord {
            item: " Soda ".to_string(),
            coins: "2 x 1eur".to_string(),
        };
        let request = record.parse().unwrap();
        assert_eq!(request.item, "Soda");
        assert_eq!(request.payment.total(), 200);
    }

    #[test]
    fn test_record_parse_rejects_blank_item_and_bad_coins() {
        let blank = PurchaseRecord {
            item: "  ".to_string(),
            coins: "1eur".to_string(),
        };
        assert!(blank.parse().is_none());

        let bad = PurchaseRecord {
            item: "Soda".to_string(),
            coins: "a handful".to_string(),
        };
        assert!(bad.parse().is_none());
    }

    #[test]
    fn test_output_rows() {
        let output = run("item,coins\nSoda,2 x 1eur\nWater,1eur\nSoda,1eur\nJuice,1eur");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "item,paid,status,change");
        assert_eq!(lines[1], "Soda,200,dispensed,5 x 10ct");
        assert_eq!(lines[2], "Water,100,dispensed,");
        assert_eq!(lines[3], "Soda,100,insufficient_payment,");
        assert_eq!(lines[4], "Juice,100,item_not_available,");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let output = run(
            "item,coins\nSoda,three coins\n,1eur\nSoda,\"18446744073709551615 x 1ct\"\nSoda,4000000000 x 1ct\nWater,1eur",
        );
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Water,100,dispensed,");
    }

    #[test]
    fn test_quoted_coin_list() {
        let output = run("item,coins\nSoda,\"1 x 1eur, 5 x 10ct\"");
        assert!(output.contains("Soda,150,dispensed,"));
    }
}
