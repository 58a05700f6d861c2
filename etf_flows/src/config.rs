//! Dashboard configuration: parsing, normalization, and loading.
//!
//! The configuration is a small TOML document describing where the workbook
//! lives and how it is laid out:
//! - which sheet holds which dataset (focus flows, universe inflows/outflows)
//! - the date column label and the text formats dates may be written in
//! - display names for the focus family and the universe, plus an optional
//!   color palette for focus funds
//!
//! Every field is optional. [`DashboardConfig::default`] describes the
//! reference workbook (`ETF_Fund_Flows_5016_Complete.xlsx`).
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]
//! - Normalization of an already-built value: [`normalize_config`]

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use chrono::format::{Item, StrftimeItems};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shared_utils::get_optional_env_var;

use crate::models::dataset::DatasetKind;

/// Environment variable that overrides [`DashboardConfig::workbook`].
pub const WORKBOOK_ENV_VAR: &str = "ETF_FLOWS_WORKBOOK";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DashboardConfig {
    /// Path of the workbook to load. Relative paths in a config file are
    /// resolved against the file's directory by [`load_config_path`].
    pub workbook: PathBuf,
    /// How dates of the three sheets are reconciled.
    pub alignment: DateAlignment,
    pub sheets: SheetNames,
    pub dates: DateColumnCfg,
    pub focus: GroupCfg,
    pub universe: GroupCfg,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("ETF_Fund_Flows_5016_Complete.xlsx"),
            alignment: DateAlignment::default(),
            sheets: SheetNames::default(),
            dates: DateColumnCfg::default(),
            focus: GroupCfg::focus_default(),
            universe: GroupCfg {
                name: "Top 100 ETFs".into(),
                colors: IndexMap::new(),
            },
        }
    }
}

/// Date reconciliation across sheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateAlignment {
    /// Re-index every table onto the union of all sheets' dates.
    #[default]
    Union,
    /// Keep each table on its own dates.
    #[serde(rename = "none")]
    AsIs,
}

/// Sheet name per dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SheetNames {
    pub focus: String,
    pub universe_inflow: String,
    pub universe_outflow: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            focus: "ARK funds".into(),
            universe_inflow: "top100 inflows".into(),
            universe_outflow: "top100 outflows".into(),
        }
    }
}

impl SheetNames {
    pub fn name(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Focus => &self.focus,
            DatasetKind::UniverseInflow => &self.universe_inflow,
            DatasetKind::UniverseOutflow => &self.universe_outflow,
        }
    }
}

/// Date column description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DateColumnCfg {
    /// Expected header label of the first column. Only checked for a warning.
    pub column: String,
    /// `chrono` strftime formats tried, in order, for dates stored as text.
    pub formats: Vec<String>,
}

impl Default for DateColumnCfg {
    fn default() -> Self {
        Self {
            column: "Date".into(),
            formats: vec!["%m/%d/%Y".into(), "%Y-%m-%d".into()],
        }
    }
}

/// Display settings for a group of funds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroupCfg {
    pub name: String,
    /// Fund identifier -> CSS color.
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}

impl GroupCfg {
    fn focus_default() -> Self {
        let colors = [
            ("ARKK", "#FF6B6B"),
            ("ARKF", "#4ECDC4"),
            ("ARKB", "#45B7D1"),
            ("ARKX", "#96CEB4"),
            ("ARKG", "#FFEAA7"),
            ("ARKQ", "#DDA0DD"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            name: "ARK Funds".into(),
            colors,
        }
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Number of sheet names that changed when trimming.
    pub sheets_trimmed: usize,
    /// Count of removed duplicate or blank date formats.
    pub date_formats_deduped: usize,
    /// Count of palette entries dropped because the fund or color was blank.
    pub colors_dropped: usize,
}

/// Normalize a configuration in-place.
///
/// What normalization does:
/// - Trims sheet names and rejects empty ones or two datasets sharing a sheet
///   (compared case-insensitively)
/// - Trims the date column label
/// - Trims date formats, drops blanks and duplicates (first occurrence wins),
///   and rejects formats `chrono` cannot interpret
/// - Trims group names (must stay non-empty) and palette entries, dropping
///   entries with a blank fund or color
///
/// Errors:
/// - Empty or colliding sheet names
/// - No usable date format left, or an invalid one
/// - Empty group name
pub fn normalize_config(cfg: &mut DashboardConfig) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    let mut seen_sheets = HashSet::new();
    for sheet in [
        &mut cfg.sheets.focus,
        &mut cfg.sheets.universe_inflow,
        &mut cfg.sheets.universe_outflow,
    ] {
        let trimmed = sheet.trim().to_string();
        if trimmed.is_empty() {
            bail!("sheet name cannot be empty after trimming");
        }
        if trimmed != *sheet {
            report.sheets_trimmed += 1;
        }
        if !seen_sheets.insert(trimmed.to_lowercase()) {
            bail!("sheet {trimmed:?} is assigned to more than one dataset");
        }
        *sheet = trimmed;
    }

    cfg.dates.column = cfg.dates.column.trim().to_string();

    let before = cfg.dates.formats.len();
    let mut seen_formats = HashSet::new();
    let mut formats = Vec::with_capacity(before);
    for raw in std::mem::take(&mut cfg.dates.formats) {
        let fmt = raw.trim().to_string();
        if fmt.is_empty() || !seen_formats.insert(fmt.clone()) {
            continue;
        }
        if StrftimeItems::new(&fmt).any(|item| matches!(item, Item::Error)) {
            bail!("invalid date format {fmt:?}");
        }
        formats.push(fmt);
    }
    if formats.is_empty() {
        bail!("at least one date format is required");
    }
    report.date_formats_deduped = before - formats.len();
    cfg.dates.formats = formats;

    for group in [&mut cfg.focus, &mut cfg.universe] {
        group.name = group.name.trim().to_string();
        if group.name.is_empty() {
            bail!("group name cannot be empty after trimming");
        }
        let before = group.colors.len();
        group.colors = std::mem::take(&mut group.colors)
            .into_iter()
            .map(|(fund, color)| (fund.trim().to_string(), color.trim().to_string()))
            .filter(|(fund, color)| !fund.is_empty() && !color.is_empty())
            .collect();
        report.colors_dropped += before - group.colors.len();
    }

    Ok(report)
}

/// Parse and normalize a configuration from a TOML string.
///
/// Errors:
/// - TOML parse failures (including unknown keys)
/// - Normalization errors (see [`normalize_config`])
pub fn load_config_str(toml_str: &str) -> anyhow::Result<DashboardConfig> {
    let mut cfg: DashboardConfig =
        toml::from_str(toml_str).context("failed to parse dashboard config TOML")?;
    let report = normalize_config(&mut cfg).context("normalize_config failed")?;
    tracing::debug!(?report, "normalized dashboard config");
    Ok(cfg)
}

/// Read a configuration file from disk, parse, and normalize it.
///
/// A relative `workbook` path is resolved against the file's directory.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<DashboardConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    let mut cfg = load_config_str(&text)
        .with_context(|| format!("load config file {}", path.display()))?;
    if cfg.workbook.is_relative() {
        if let Some(dir) = path.parent() {
            cfg.workbook = dir.join(&cfg.workbook);
        }
    }
    Ok(cfg)
}

impl DashboardConfig {
    /// Workbook path after overrides: `cli_override`, then
    /// [`WORKBOOK_ENV_VAR`], then the configured path.
    pub fn resolve_workbook(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(p) = cli_override {
            return p.to_path_buf();
        }
        get_optional_env_var(WORKBOOK_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.workbook.clone())
    }
}
