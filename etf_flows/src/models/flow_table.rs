//! Date × fund table of signed flow amounts.

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::errors::TableShapeError;
use crate::models::fund::FundId;

/// One fund's values along a table's date axis. `None` marks a missing cell.
pub type FlowSeries = Vec<Option<f64>>;

/// A table keyed by (date, fund) holding signed flow amounts.
///
/// Invariants enforced by [`FlowTable::new`]:
/// - dates are strictly ascending (so unique)
/// - every column holds exactly one cell per date
/// - present values are finite; `NaN`/`inf` are stored as missing
///
/// Column order is preserved from construction and doubles as the default
/// display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowTable {
    dates: Vec<NaiveDate>,
    columns: IndexMap<FundId, FlowSeries>,
}

impl FlowTable {
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: IndexMap<FundId, FlowSeries>,
    ) -> Result<Self, TableShapeError> {
        if let Some(i) = dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(TableShapeError::UnorderedDates {
                previous: dates[i],
                date: dates[i + 1],
            });
        }

        let mut columns = columns;
        for (fund, series) in columns.iter_mut() {
            if series.len() != dates.len() {
                return Err(TableShapeError::ColumnLength {
                    fund: fund.to_string(),
                    expected: dates.len(),
                    actual: series.len(),
                });
            }
            for cell in series.iter_mut() {
                if cell.is_some_and(|v| !v.is_finite()) {
                    *cell = None;
                }
            }
        }

        Ok(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &IndexMap<FundId, FlowSeries> {
        &self.columns
    }

    pub fn funds(&self) -> impl Iterator<Item = &FundId> {
        self.columns.keys()
    }

    pub fn column(&self, fund: &str) -> Option<&[Option<f64>]> {
        self.columns.get(fund).map(Vec::as_slice)
    }

    /// Value at (date, fund); `None` if the date, the fund, or the cell is missing.
    pub fn value(&self, date: NaiveDate, fund: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.columns.get(fund)?[row]
    }

    /// Number of dates (rows).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn fund_count(&self) -> usize {
        self.columns.len()
    }

    /// Restricts the table to `subset`, keeping this table's column order.
    /// Identifiers the table does not carry are ignored.
    pub fn project(&self, subset: &IndexSet<FundId>) -> FlowTable {
        let columns = self
            .columns
            .iter()
            .filter(|(fund, _)| subset.contains(*fund))
            .map(|(fund, series)| (fund.clone(), series.clone()))
            .collect();
        FlowTable {
            dates: self.dates.clone(),
            columns,
        }
    }

    /// Re-indexes the table onto `dates` (ascending), leaving cells for dates
    /// this table does not have as missing. Dates not listed are dropped.
    pub fn reindex(&self, dates: &[NaiveDate]) -> Result<FlowTable, TableShapeError> {
        let rows: Vec<Option<usize>> = dates
            .iter()
            .map(|d| self.dates.binary_search(d).ok())
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|(fund, series)| {
                let cells = rows.iter().map(|r| r.and_then(|i| series[i])).collect();
                (fund.clone(), cells)
            })
            .collect();

        FlowTable::new(dates.to_vec(), columns)
    }
}
