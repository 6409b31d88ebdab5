//! Bank Queue CLI
//!
//! Reads account openings and pending operations from CSV, settles them
//! through the tiered dispatcher and prints final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv [capacity-per-tier] > balances.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use bank_queue::{BatchProcessor, DispatchError, ProcessorConfig, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(DispatchError::MissingArgument);
    }

    let config = match args.get(2) {
        Some(raw) => ProcessorConfig::from_capacity_arg(raw)?,
        None => ProcessorConfig::default(),
    };

    let file = File::open(&args[1])?;
    let reader = BufReader::new(file);

    let mut processor = BatchProcessor::new(config);
    processor.process_csv(reader)?;
    processor.settle();

    let stdout = io::stdout();
    let handle = stdout.lock();
    processor.write_output(handle)?;

    Ok(())
}
