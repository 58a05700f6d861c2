use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::compare::FlowDirection;
use crate::models::dataset::DatasetKind;

#[derive(Parser)]
#[command(author, version, about = "ETF fund flow views")]
pub struct Cli {
    /// Path to the config file (etf_flows.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Workbook to load; overrides the config file and ETF_FLOWS_WORKBOOK
    #[arg(short, long)]
    pub workbook: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the focus family and the comparison universe
    Funds,

    /// Compute one view over a dataset
    View {
        /// Dataset: focus, inflows or outflows
        #[arg(long, default_value = "focus")]
        source: DatasetKind,

        /// Running sums instead of daily flows
        #[arg(long)]
        cumulative: bool,

        /// Each fund's share of the per-date total
        #[arg(long)]
        percentage: bool,

        /// Comma-separated fund identifiers (e.g. "ARKK,ARKF"); default is all
        #[arg(long, value_delimiter = ',')]
        funds: Vec<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Focus family vs. universe for one flow direction, as JSON
    Compare {
        /// inflows or outflows
        #[arg(long, default_value = "inflows")]
        direction: FlowDirection,

        #[arg(long)]
        cumulative: bool,

        #[arg(long)]
        percentage: bool,

        /// Comma-separated focus funds; default is all
        #[arg(long, value_delimiter = ',')]
        focus: Vec<String>,

        /// Comma-separated universe funds; default is all
        #[arg(long, value_delimiter = ',')]
        universe: Vec<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the raw sheets as CSV files
    Export {
        /// Only this dataset (focus, inflows, outflows); default is all three
        #[arg(long)]
        dataset: Option<DatasetKind>,

        /// Target directory (created if missing)
        #[arg(long)]
        dir: PathBuf,

        /// Suffix file names with a UTC timestamp
        #[arg(long)]
        timestamp: bool,
    },

    /// Print the first rows of a raw sheet
    Preview {
        #[arg(long, default_value = "focus")]
        dataset: DatasetKind,

        #[arg(long, default_value_t = 20)]
        rows: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}
