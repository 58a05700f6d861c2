//! Focus-vs-universe comparison views.
//!
//! A comparison pairs the focus family's view with the universe's inflow or
//! outflow view under the same modes, and carries the labels a chart needs.
//! Nothing here knows how the result is drawn.

use std::{fmt, str::FromStr};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::errors::ViewError;
use crate::models::{
    dataset::{DatasetKind, FlowDataset},
    fund::FundId,
};
use crate::view::{FlowBasis, ValueScale, ViewResult, transform};

/// Which universe table the focus family is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    Inflows,
    Outflows,
}

impl FlowDirection {
    pub const fn dataset(self) -> DatasetKind {
        match self {
            FlowDirection::Inflows => DatasetKind::UniverseInflow,
            FlowDirection::Outflows => DatasetKind::UniverseOutflow,
        }
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowDirection::Inflows => "Inflows",
            FlowDirection::Outflows => "Outflows",
        })
    }
}

impl FromStr for FlowDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inflows" | "inflow" | "in" => Ok(FlowDirection::Inflows),
            "outflows" | "outflow" | "out" => Ok(FlowDirection::Outflows),
            other => Err(format!("unknown flow direction: {other}")),
        }
    }
}

/// Focus and universe views under one set of modes, plus display labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub title: String,
    pub y_axis_title: String,
    pub direction: FlowDirection,
    pub focus_label: String,
    pub universe_label: String,
    pub focus: ViewResult,
    pub universe: ViewResult,
    /// Fund -> color for focus funds present in `focus`.
    pub palette: IndexMap<FundId, String>,
}

/// Builds the comparison for `direction`.
///
/// `None` subsets select every fund of the respective table.
///
/// Errors:
/// - [`ViewError::InvalidSubset`] when a given subset is empty or a table
///   has no funds at all
pub fn compare(
    dataset: &FlowDataset,
    cfg: &DashboardConfig,
    direction: FlowDirection,
    basis: FlowBasis,
    scale: ValueScale,
    focus_subset: Option<&IndexSet<FundId>>,
    universe_subset: Option<&IndexSet<FundId>>,
) -> Result<ComparisonView, ViewError> {
    let universe_table = dataset.table(direction.dataset());

    let all_focus: IndexSet<FundId>;
    let focus_subset = match focus_subset {
        Some(s) => s,
        None => {
            all_focus = dataset.focus.funds().cloned().collect();
            &all_focus
        }
    };
    let all_universe: IndexSet<FundId>;
    let universe_subset = match universe_subset {
        Some(s) => s,
        None => {
            all_universe = universe_table.funds().cloned().collect();
            &all_universe
        }
    };

    let focus = transform(&dataset.focus, focus_subset, basis, scale)?;
    let universe = transform(universe_table, universe_subset, basis, scale)?;

    let palette = focus
        .funds()
        .filter_map(|f| cfg.focus.colors.get(f.as_str()).map(|c| (f.clone(), c.clone())))
        .collect();

    let focus_label = dataset.focus_funds.name().to_string();
    let universe_label = dataset.universe.name().to_string();

    Ok(ComparisonView {
        title: format!("{focus_label} vs {universe_label} {direction} - {basis} Flows ({scale})"),
        y_axis_title: y_axis_title(basis, scale),
        direction,
        focus_label,
        universe_label,
        focus,
        universe,
        palette,
    })
}

fn y_axis_title(basis: FlowBasis, scale: ValueScale) -> String {
    let base = match scale {
        ValueScale::Absolute => "Flow Value ($ Millions)",
        ValueScale::Percentage => "Share of Total (%)",
    };
    match basis {
        FlowBasis::Cumulative => format!("Cumulative {base}"),
        FlowBasis::Daily => base.to_string(),
    }
}
