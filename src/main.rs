//! Vending Machine CLI
//!
//! Loads an inventory and a coin reserve, runs a CSV of purchase requests
//! through the machine, and writes one result row per request.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- inventory.csv purchases.csv reserve.csv > results.csv
//! ```
//!
//! Without a reserve file the machine starts with a random euro reserve.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity
//! - `VENDING_MAX_COINS`: Maximum coins per denomination in a random reserve (default 20)

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use vending_machine::{batch, config, EngineError, Result, VendingMachine};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(EngineError::MissingArgument);
    }

    let inventory = config::load_inventory(BufReader::new(File::open(&args[1])?))?;

    let mut machine = match args.get(3) {
        Some(reserve_path) => {
            let reserve = config::load_reserve(BufReader::new(File::open(reserve_path)?))?;
            VendingMachine::new(inventory, reserve)
        }
        None => VendingMachine::with_generator(inventory, &mut config::random_reserve_generator()),
    };

    let purchases = BufReader::new(File::open(&args[2])?);
    let outcomes = batch::process_csv(&mut machine, purchases)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    batch::write_output(&outcomes, handle)?;

    Ok(())
}
