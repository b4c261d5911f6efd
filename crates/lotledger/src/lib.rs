//! lotledger CLI tools.
//!
//! This crate provides command-line tools over a brokerage data directory:
//!
//! - `lotledger-report`: Realized gains, open holdings and net deposits
//! - `lotledger-check`: Load and replay everything, failing on the first error
//!
//! # Example Usage
//!
//! ```bash
//! lotledger-check --data ./data
//! lotledger-report --data ./data gains --from 2020-01-01 --to 2020-12-31
//! lotledger-report --data ./data holdings --format json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod table;
