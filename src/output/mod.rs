//! Output module for writing harvested records
//!
//! This module handles:
//! - Serializing the record store to CSV
//! - Recording and printing run statistics

mod csv_writer;
pub mod stats;
mod traits;

pub use csv_writer::{CsvWriter, HEADER};
pub use stats::{print_statistics, RunStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
