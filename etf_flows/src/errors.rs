//! Error types for loading and viewing flow data.
//!
//! Export errors live next to the sinks in [`crate::export`].

use chrono::NaiveDate;
use thiserror::Error;

/// Structural problems with a [`FlowTable`](crate::models::flow_table::FlowTable).
#[derive(Debug, Error, PartialEq)]
pub enum TableShapeError {
    #[error("dates must be strictly ascending: {date} follows {previous}")]
    UnorderedDates { previous: NaiveDate, date: NaiveDate },

    #[error("column {fund} has {actual} cells, expected {expected}")]
    ColumnLength {
        fund: String,
        expected: usize,
        actual: usize,
    },
}

/// Failure to produce a dataset from a workbook. No partial dataset is ever
/// returned alongside one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The workbook could not be opened or a sheet could not be read.
    #[error("cannot read workbook {source_name}: {source}")]
    Open {
        source_name: String,
        #[source]
        source: calamine::Error,
    },

    #[error("required sheet {sheet:?} is missing (available: {})", available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    #[error("sheet {sheet:?} has no header row")]
    MissingHeader { sheet: String },

    #[error("sheet {sheet:?}: header column {column} is not a fund identifier")]
    InvalidHeader { sheet: String, column: usize },

    #[error("sheet {sheet:?}: fund {fund} appears more than once in the header")]
    DuplicateFund { sheet: String, fund: String },

    /// `row` is the 1-based spreadsheet row number.
    #[error("sheet {sheet:?} row {row}: cannot parse date {value:?}")]
    InvalidDate {
        sheet: String,
        row: usize,
        value: String,
    },

    #[error("sheet {sheet:?}: date {date} appears more than once")]
    DuplicateDate { sheet: String, date: NaiveDate },

    #[error("sheet {sheet:?} has no data rows")]
    EmptySheet { sheet: String },

    #[error("sheet {sheet:?}: {source}")]
    Shape {
        sheet: String,
        #[source]
        source: TableShapeError,
    },
}

/// Errors raised while building a view.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// Nothing selected; the user should pick at least one fund.
    #[error("select at least one fund")]
    InvalidSubset,

    /// A requested fund is not part of the universe it was checked against.
    #[error("fund {fund} is not part of {universe}")]
    UnknownFund { fund: String, universe: String },
}
