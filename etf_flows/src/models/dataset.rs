//! The loaded dataset: three flow tables plus the fund sets derived from them.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{flow_table::FlowTable, fund::FundUniverse};

/// Which of the three loaded tables a view reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Flows of the focus fund family.
    Focus,
    /// Daily inflows of the comparison universe.
    UniverseInflow,
    /// Daily outflows of the comparison universe.
    UniverseOutflow,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Focus,
        DatasetKind::UniverseInflow,
        DatasetKind::UniverseOutflow,
    ];

    /// File stem used when exporting the raw table.
    pub const fn file_stem(self) -> &'static str {
        match self {
            DatasetKind::Focus => "ark_funds_flows",
            DatasetKind::UniverseInflow => "top100_inflows",
            DatasetKind::UniverseOutflow => "top100_outflows",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DatasetKind::Focus => "focus",
            DatasetKind::UniverseInflow => "inflows",
            DatasetKind::UniverseOutflow => "outflows",
        };
        f.write_str(s)
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "focus" | "ark" => Ok(DatasetKind::Focus),
            "inflows" | "inflow" | "universe_inflow" => Ok(DatasetKind::UniverseInflow),
            "outflows" | "outflow" | "universe_outflow" => Ok(DatasetKind::UniverseOutflow),
            other => Err(format!("unknown dataset: {other}")),
        }
    }
}

/// Immutable snapshot produced by one successful load.
///
/// Shared read-only (behind an `Arc`) by every view computed against it and
/// replaced wholesale on reload; see [`crate::snapshot::SnapshotStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDataset {
    pub focus: FlowTable,
    pub universe_inflow: FlowTable,
    pub universe_outflow: FlowTable,
    /// Fund identifiers of the focus sheet, in header order.
    pub focus_funds: FundUniverse,
    /// Union of the inflow and outflow sheet identifiers (inflow order first).
    pub universe: FundUniverse,
    /// Human-readable description of where the data came from.
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl FlowDataset {
    pub fn table(&self, kind: DatasetKind) -> &FlowTable {
        match kind {
            DatasetKind::Focus => &self.focus,
            DatasetKind::UniverseInflow => &self.universe_inflow,
            DatasetKind::UniverseOutflow => &self.universe_outflow,
        }
    }

    /// The fund set a selection against `kind` is validated with.
    pub fn funds_for(&self, kind: DatasetKind) -> &FundUniverse {
        match kind {
            DatasetKind::Focus => &self.focus_funds,
            DatasetKind::UniverseInflow | DatasetKind::UniverseOutflow => &self.universe,
        }
    }
}
