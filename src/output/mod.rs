//! Output module
//!
//! - CSV export of the collected company records
//! - Run statistics, logged and printed when a run ends

mod csv_writer;
pub mod summary;

pub use csv_writer::{write_csv, HEADER};
pub use summary::{print_summary, RunSummary};
