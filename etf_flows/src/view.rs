//! View transformation: daily vs. cumulative, absolute vs. share-of-total.
//!
//! [`transform`] is pure: the same table, subset and modes always give the
//! same [`ViewResult`]. The steps are
//! 1. restrict the table to the requested funds (unknown ones are dropped),
//! 2. optionally replace each series by its running sum,
//! 3. total the funds per date,
//! 4. optionally divide every value by its date's total.
//!
//! Missing cells never raise: they contribute nothing to running sums and
//! totals, and a date whose total is zero or missing has no percentages.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::errors::ViewError;
use crate::models::{
    dataset::{DatasetKind, FlowDataset},
    flow_table::{FlowSeries, FlowTable},
    fund::FundId,
};

/// Daily flows or their running sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowBasis {
    #[default]
    Daily,
    Cumulative,
}

/// Raw amounts or each fund's fraction of the per-date total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueScale {
    #[default]
    Absolute,
    Percentage,
}

impl FlowBasis {
    pub const fn from_flag(cumulative: bool) -> Self {
        if cumulative { Self::Cumulative } else { Self::Daily }
    }
}

impl ValueScale {
    pub const fn from_flag(percentage: bool) -> Self {
        if percentage { Self::Percentage } else { Self::Absolute }
    }
}

impl fmt::Display for FlowBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowBasis::Daily => "Daily",
            FlowBasis::Cumulative => "Cumulative",
        })
    }
}

impl fmt::Display for ValueScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueScale::Absolute => "Absolute Value",
            ValueScale::Percentage => "Share of Total",
        })
    }
}

impl FromStr for FlowBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(FlowBasis::Daily),
            "cumulative" | "cum" => Ok(FlowBasis::Cumulative),
            other => Err(format!("unknown flow basis: {other}")),
        }
    }
}

impl FromStr for ValueScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "absolute" | "abs" => Ok(ValueScale::Absolute),
            "percentage" | "percent" | "pct" => Ok(ValueScale::Percentage),
            other => Err(format!("unknown value scale: {other}")),
        }
    }
}

/// Everything needed to compute one view. Carries no hidden state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub source: DatasetKind,
    pub basis: FlowBasis,
    pub scale: ValueScale,
    pub funds: IndexSet<FundId>,
}

impl ViewRequest {
    /// Runs [`transform`] against the table this request names.
    pub fn apply(&self, dataset: &FlowDataset) -> Result<ViewResult, ViewError> {
        transform(dataset.table(self.source), &self.funds, self.basis, self.scale)
    }
}

/// Derived series on the source table's date axis, ready for charting/export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult {
    pub basis: FlowBasis,
    pub scale: ValueScale,
    dates: Vec<NaiveDate>,
    series: IndexMap<FundId, FlowSeries>,
    /// Per-date sum of the (daily or cumulative) values before any
    /// percentage scaling; `None` when every fund is missing at that date.
    totals: Vec<Option<f64>>,
}

impl ViewResult {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Final per-fund series, in the source table's column order.
    pub fn series(&self) -> &IndexMap<FundId, FlowSeries> {
        &self.series
    }

    pub fn column(&self, fund: &str) -> Option<&[Option<f64>]> {
        self.series.get(fund).map(Vec::as_slice)
    }

    pub fn totals(&self) -> &[Option<f64>] {
        &self.totals
    }

    pub fn funds(&self) -> impl Iterator<Item = &FundId> {
        self.series.keys()
    }
}

/// Computes a view of `table` restricted to `subset`.
///
/// Errors:
/// - [`ViewError::InvalidSubset`] when `subset` is empty
pub fn transform(
    table: &FlowTable,
    subset: &IndexSet<FundId>,
    basis: FlowBasis,
    scale: ValueScale,
) -> Result<ViewResult, ViewError> {
    if subset.is_empty() {
        return Err(ViewError::InvalidSubset);
    }

    let projected = table.project(subset);
    let dropped = subset.len() - projected.fund_count();
    if dropped > 0 {
        tracing::debug!(dropped, "ignoring funds the table does not carry");
    }

    let mut series: IndexMap<FundId, FlowSeries> = projected
        .columns()
        .iter()
        .map(|(fund, raw)| {
            let values = match basis {
                FlowBasis::Daily => raw.clone(),
                FlowBasis::Cumulative => running_sum(raw),
            };
            (fund.clone(), values)
        })
        .collect();

    let totals = per_date_totals(projected.len(), &series);

    if scale == ValueScale::Percentage {
        for values in series.values_mut() {
            for (cell, total) in values.iter_mut().zip(&totals) {
                *cell = match (*cell, *total) {
                    (Some(v), Some(t)) if t != 0.0 && t.is_finite() => Some(v / t),
                    _ => None,
                };
            }
        }
    }

    Ok(ViewResult {
        basis,
        scale,
        dates: projected.dates().to_vec(),
        series,
        totals,
    })
}

/// Running sum where a missing value adds nothing and the sum carries over.
fn running_sum(raw: &[Option<f64>]) -> FlowSeries {
    raw.iter()
        .scan(0.0_f64, |acc, v| {
            *acc += v.unwrap_or(0.0);
            Some(Some(*acc))
        })
        .collect()
}

fn per_date_totals(rows: usize, series: &IndexMap<FundId, FlowSeries>) -> Vec<Option<f64>> {
    (0..rows)
        .map(|i| {
            series
                .values()
                .filter_map(|s| s[i])
                .fold(None, |acc: Option<f64>, v| Some(acc.unwrap_or(0.0) + v))
        })
        .collect()
}
