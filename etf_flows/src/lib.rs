//! Loading and reshaping of ETF fund-flow workbooks.
//!
//! A workbook with three sheets (focus-family flows, universe inflows,
//! universe outflows) is loaded once into an immutable [`FlowDataset`];
//! views over it are computed on demand by [`view::transform`] and exported
//! with [`export::to_csv`].
//!
//! ```no_run
//! use etf_flows::{config::DashboardConfig, loader::{WorkbookSource, load}};
//! use etf_flows::view::{FlowBasis, ValueScale, transform};
//!
//! let cfg = DashboardConfig::default();
//! let data = load(&WorkbookSource::path(&cfg.workbook), &cfg)?;
//! let funds = data.focus_funds.select(&["ARKK", "ARKF"])?;
//! let view = transform(&data.focus, &funds, FlowBasis::Cumulative, ValueScale::Percentage)?;
//! let csv = etf_flows::export::to_csv(&view)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod export;
pub mod loader;
pub mod models;
pub mod snapshot;
pub mod view;

pub use errors::{LoadError, ViewError};
pub use models::{
    dataset::{DatasetKind, FlowDataset},
    flow_table::FlowTable,
    fund::{FundId, FundUniverse},
};
