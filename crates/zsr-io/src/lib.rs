//! zsr-io - Table I/O for reading-log reports
//!
//! This crate reads the two tabular sources a report is built from:
//!
//! - **Library**: one row per catalogued book (a libib-style export)
//! - **Daily log**: one row per (date, book) reading session
//!
//! # Design
//!
//! Reading is all-or-nothing per source: a table either loads completely
//! or fails with an `IoError`. Cell-level problems (a bad date, a stray
//! number) are not I/O failures; the `parse` helpers coerce them to `None`
//! and leave the decision to drop a row to the caller.

pub mod csv_reader;
pub mod parse;
pub mod reader;
pub mod schema;

pub use csv_reader::*;
pub use parse::*;
pub use reader::*;
pub use schema::*;
