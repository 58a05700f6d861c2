//! Workbook loading.
//!
//! [`load`] reads the three configured sheets of a workbook into
//! [`FlowTable`]s and bundles them into one immutable [`FlowDataset`]:
//! - row 1 is the header: a date label, then one fund identifier per column
//! - every following non-blank row is one date of flows
//! - blank/non-numeric flow cells are kept as missing, never as zero
//! - rows are sorted ascending by date; header order is kept for columns
//!
//! Loading is all-or-nothing: if any sheet fails, no dataset is returned.

mod align;
mod cells;

use std::{
    io::{Cursor, Read, Seek},
    path::PathBuf,
};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use chrono::{NaiveDate, Utc};
use indexmap::{IndexMap, IndexSet};

use crate::config::{DashboardConfig, DateAlignment};
use crate::errors::LoadError;
use crate::models::{
    dataset::{DatasetKind, FlowDataset},
    flow_table::{FlowSeries, FlowTable},
    fund::{FundId, FundUniverse},
};

/// Where a workbook is read from.
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    /// A file on disk; the format is detected from the extension.
    Path(PathBuf),
    /// An in-memory upload. `name` is only used in messages.
    Bytes { name: String, bytes: Vec<u8> },
}

impl WorkbookSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        WorkbookSource::Path(path.into())
    }

    pub fn bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        WorkbookSource::Bytes {
            name: name.into(),
            bytes,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            WorkbookSource::Path(p) => p.display().to_string(),
            WorkbookSource::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Loads the focus, universe-inflow and universe-outflow sheets of `source`.
pub fn load(source: &WorkbookSource, cfg: &DashboardConfig) -> Result<FlowDataset, LoadError> {
    let source_name = source.describe();
    tracing::info!(source = %source_name, "loading workbook");

    let open_err = |e: calamine::Error| LoadError::Open {
        source_name: source_name.clone(),
        source: e,
    };

    let dataset = match source {
        WorkbookSource::Path(path) => {
            let mut workbook = open_workbook_auto(path).map_err(open_err)?;
            load_from_workbook(&mut workbook, &source_name, cfg)?
        }
        WorkbookSource::Bytes { bytes, .. } => {
            let mut workbook =
                open_workbook_auto_from_rs(Cursor::new(bytes.as_slice())).map_err(open_err)?;
            load_from_workbook(&mut workbook, &source_name, cfg)?
        }
    };

    tracing::info!(
        source = %source_name,
        dates = dataset.focus.len(),
        focus_funds = dataset.focus_funds.len(),
        universe_funds = dataset.universe.len(),
        "workbook loaded"
    );
    Ok(dataset)
}

fn load_from_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    source_name: &str,
    cfg: &DashboardConfig,
) -> Result<FlowDataset, LoadError> {
    let available = workbook.sheet_names();

    let mut read = |kind: DatasetKind| -> Result<(String, FlowTable), LoadError> {
        let wanted = cfg.sheets.name(kind);
        let sheet = resolve_sheet_name(&available, wanted).ok_or_else(|| LoadError::MissingSheet {
            sheet: wanted.to_string(),
            available: available.clone(),
        })?;
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| LoadError::Open {
                source_name: source_name.to_string(),
                source: e,
            })?;
        let table = read_sheet(&range, &sheet, cfg)?;
        tracing::debug!(%kind, sheet = %sheet, dates = table.len(), funds = table.fund_count(), "parsed sheet");
        Ok((sheet, table))
    };

    let focus = read(DatasetKind::Focus)?;
    let inflow = read(DatasetKind::UniverseInflow)?;
    let outflow = read(DatasetKind::UniverseOutflow)?;

    let (focus, universe_inflow, universe_outflow) = match cfg.alignment {
        DateAlignment::Union => {
            let calendar = align::union_dates([&focus.1, &inflow.1, &outflow.1]);
            (
                align_sheet(focus, &calendar)?,
                align_sheet(inflow, &calendar)?,
                align_sheet(outflow, &calendar)?,
            )
        }
        DateAlignment::AsIs => (focus.1, inflow.1, outflow.1),
    };

    let focus_funds = FundUniverse::new(cfg.focus.name.clone(), focus.funds().cloned());
    let universe = FundUniverse::new(
        cfg.universe.name.clone(),
        universe_inflow
            .funds()
            .chain(universe_outflow.funds())
            .cloned()
            .collect::<IndexSet<_>>(),
    );

    Ok(FlowDataset {
        focus,
        universe_inflow,
        universe_outflow,
        focus_funds,
        universe,
        source: source_name.to_string(),
        loaded_at: Utc::now(),
    })
}

fn align_sheet(
    (sheet, table): (String, FlowTable),
    calendar: &[NaiveDate],
) -> Result<FlowTable, LoadError> {
    align::align_to(table, calendar).map_err(|source| LoadError::Shape { sheet, source })
}

/// Exact match first, then a trimmed case-insensitive match.
fn resolve_sheet_name(available: &[String], wanted: &str) -> Option<String> {
    available
        .iter()
        .find(|s| s.as_str() == wanted)
        .or_else(|| {
            available
                .iter()
                .find(|s| s.trim().eq_ignore_ascii_case(wanted.trim()))
        })
        .cloned()
}

/// Parses one sheet into a table.
fn read_sheet(range: &Range<Data>, sheet: &str, cfg: &DashboardConfig) -> Result<FlowTable, LoadError> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| LoadError::MissingHeader {
        sheet: sheet.to_string(),
    })?;

    // Formatting can leave blank cells to the right of the last fund.
    let width = header
        .iter()
        .rposition(|c| !cells::is_blank(c))
        .map_or(0, |last| last + 1);
    if width == 0 {
        return Err(LoadError::MissingHeader {
            sheet: sheet.to_string(),
        });
    }

    let date_label = cells::cell_text(&header[0]);
    if !date_label.trim().eq_ignore_ascii_case(&cfg.dates.column) {
        tracing::warn!(sheet, found = %date_label, expected = %cfg.dates.column, "unexpected date column label");
    }

    let mut funds = IndexSet::with_capacity(width.saturating_sub(1));
    for (column, cell) in header.iter().enumerate().take(width).skip(1) {
        let fund = FundId::new(&cells::cell_text(cell)).ok_or_else(|| LoadError::InvalidHeader {
            sheet: sheet.to_string(),
            column: column + 1,
        })?;
        if !funds.insert(fund.clone()) {
            return Err(LoadError::DuplicateFund {
                sheet: sheet.to_string(),
                fund: fund.to_string(),
            });
        }
    }

    // 1-based spreadsheet row of the first data row.
    let first_data_row = range.start().map_or(0, |(row, _)| row as usize) + 2;

    let mut records: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();
    for (offset, row) in rows.enumerate() {
        if row.iter().all(cells::is_blank) {
            continue;
        }
        let date_cell = &row[0];
        let date = cells::parse_date(date_cell, &cfg.dates.formats).ok_or_else(|| {
            LoadError::InvalidDate {
                sheet: sheet.to_string(),
                row: first_data_row + offset,
                value: cells::cell_text(date_cell),
            }
        })?;
        let values = (1..=funds.len())
            .map(|c| row.get(c).and_then(cells::parse_flow))
            .collect();
        records.push((date, values));
    }

    if records.is_empty() {
        return Err(LoadError::EmptySheet {
            sheet: sheet.to_string(),
        });
    }

    records.sort_by_key(|(date, _)| *date);
    if let Some(pair) = records.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(LoadError::DuplicateDate {
            sheet: sheet.to_string(),
            date: pair[0].0,
        });
    }

    let dates: Vec<NaiveDate> = records.iter().map(|(d, _)| *d).collect();
    let mut columns: IndexMap<FundId, FlowSeries> = funds
        .into_iter()
        .map(|f| (f, Vec::with_capacity(dates.len())))
        .collect();
    for (_, values) in records {
        for (series, value) in columns.values_mut().zip(values) {
            series.push(value);
        }
    }

    FlowTable::new(dates, columns).map_err(|source| LoadError::Shape {
        sheet: sheet.to_string(),
        source,
    })
}
