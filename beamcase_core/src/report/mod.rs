//! # Reports
//!
//! Turns solved scenarios into the artifacts of a run:
//!
//! - `<scenario>.csv` - the response grid ([`diagram_csv`])
//! - `<scenario>.txt` - a one-line description ([`describe_scenario`])
//! - `summary.csv` - one row per scenario ([`SummaryTable`])
//!
//! All numeric report values except grid values and locations use
//! [`eng_notation`].

pub mod description;
pub mod notation;
pub mod table;

pub use description::{describe_scenario, normalize_whitespace};
pub use notation::{eng_notation, DEFAULT_PLACES};
pub use table::{diagram_csv, SummaryRow, SummaryTable, TableSchema, MISSING};
