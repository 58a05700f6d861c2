//! CSV export of views and raw tables.
//!
//! The CSV layout is the same for both: a `Date` column with ISO calendar
//! dates followed by one column per fund; missing cells are empty fields.

mod sink;

use chrono::NaiveDate;
use csv::WriterBuilder;
use indexmap::IndexMap;
use snafu::{Backtrace, ResultExt, Snafu};

use crate::models::{
    flow_table::{FlowSeries, FlowTable},
    fund::FundId,
};
use crate::view::ViewResult;

pub use sink::{DirectorySink, ExportSink};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ExportError {
    /// The CSV encoder rejected a record.
    #[snafu(display("Failed to encode CSV: {source}"))]
    Csv {
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// The encoder could not hand back its buffer.
    #[snafu(display("Failed to flush CSV buffer: {message}"))]
    Flush {
        message: String,
        backtrace: Backtrace,
    },

    /// Writing the exported file failed.
    #[snafu(display("I/O error on {}: {source}", path.display()))]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

/// Header label of the leading date column.
pub const DATE_HEADER: &str = "Date";

/// Serializes a view's per-fund series (not its totals).
pub fn to_csv(view: &ViewResult) -> Result<Vec<u8>, ExportError> {
    write_csv(view.dates(), view.series())
}

/// Serializes a raw loaded table.
pub fn table_to_csv(table: &FlowTable) -> Result<Vec<u8>, ExportError> {
    write_csv(table.dates(), table.columns())
}

fn write_csv(
    dates: &[NaiveDate],
    columns: &IndexMap<FundId, FlowSeries>,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    let header = std::iter::once(DATE_HEADER).chain(columns.keys().map(FundId::as_str));
    writer.write_record(header).context(CsvSnafu)?;

    let mut record = Vec::with_capacity(columns.len() + 1);
    for (row, date) in dates.iter().enumerate() {
        record.clear();
        record.push(date.format("%Y-%m-%d").to_string());
        record.extend(
            columns
                .values()
                .map(|series| series[row].map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).context(CsvSnafu)?;
    }

    writer.into_inner().map_err(|e| {
        FlushSnafu {
            message: e.error().to_string(),
        }
        .build()
    })
}
