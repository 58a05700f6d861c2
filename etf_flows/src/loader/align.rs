//! Date alignment across the loaded sheets.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::errors::TableShapeError;
use crate::models::flow_table::FlowTable;

/// Ascending union of the dates of every table.
pub(crate) fn union_dates<'a>(tables: impl IntoIterator<Item = &'a FlowTable>) -> Vec<NaiveDate> {
    tables
        .into_iter()
        .flat_map(|t| t.dates().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Re-indexes `table` onto `calendar`, skipping the copy when it already matches.
pub(crate) fn align_to(
    table: FlowTable,
    calendar: &[NaiveDate],
) -> Result<FlowTable, TableShapeError> {
    if table.dates() == calendar {
        return Ok(table);
    }
    table.reindex(calendar)
}
