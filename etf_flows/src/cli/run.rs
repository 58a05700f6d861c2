use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use indexmap::IndexSet;
use shared_utils::get_optional_env_var;

use super::commands::{Cli, Commands, OutputFormat};
use super::render;
use crate::compare::compare;
use crate::config::{DashboardConfig, load_config_path};
use crate::export::{DirectorySink, ExportSink, table_to_csv, to_csv};
use crate::loader::WorkbookSource;
use crate::models::{
    dataset::{DatasetKind, FlowDataset},
    fund::FundId,
};
use crate::snapshot::SnapshotStore;
use crate::view::{FlowBasis, ValueScale, ViewRequest};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "ETF_FLOWS_CONFIG";

fn load_config(cli_path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    let path = cli_path
        .map(Path::to_path_buf)
        .or_else(|| get_optional_env_var(CONFIG_ENV_VAR).map(PathBuf::from));
    match path {
        Some(p) => load_config_path(&p),
        None => Ok(DashboardConfig::default()),
    }
}

/// Executes one CLI invocation. Results go to stdout (or `--output`),
/// diagnostics go through `tracing` to stderr.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    let workbook = cfg.resolve_workbook(cli.workbook.as_deref());

    let store = SnapshotStore::open(&WorkbookSource::path(&workbook), &cfg)
        .context("data unavailable")?;
    let data = store.current();

    match cli.command {
        Commands::Funds => emit(None, render::fund_lists(&data).as_bytes()),

        Commands::View {
            source,
            cumulative,
            percentage,
            funds,
            format,
            output,
        } => {
            let request = ViewRequest {
                source,
                basis: FlowBasis::from_flag(cumulative),
                scale: ValueScale::from_flag(percentage),
                funds: select(&data, source, &funds)?,
            };
            let view = request.apply(&data)?;
            let bytes = match format {
                OutputFormat::Table => format!("{}\n", render::view_table(&view)).into_bytes(),
                OutputFormat::Csv => to_csv(&view)?,
                OutputFormat::Json => serde_json::to_vec_pretty(&view)?,
            };
            emit(output.as_deref(), &bytes)
        }

        Commands::Compare {
            direction,
            cumulative,
            percentage,
            focus,
            universe,
            output,
        } => {
            let focus = (!focus.is_empty())
                .then(|| select(&data, DatasetKind::Focus, &focus))
                .transpose()?;
            let universe = (!universe.is_empty())
                .then(|| select(&data, direction.dataset(), &universe))
                .transpose()?;
            let view = compare(
                &data,
                &cfg,
                direction,
                FlowBasis::from_flag(cumulative),
                ValueScale::from_flag(percentage),
                focus.as_ref(),
                universe.as_ref(),
            )?;
            emit(output.as_deref(), &serde_json::to_vec_pretty(&view)?)
        }

        Commands::Export {
            dataset,
            dir,
            timestamp,
        } => {
            let sink = DirectorySink::new(dir).timestamped(timestamp);
            let kinds = dataset.map_or_else(|| DatasetKind::ALL.to_vec(), |k| vec![k]);
            for kind in kinds {
                let csv = table_to_csv(data.table(kind))?;
                let path = sink.write(kind.file_stem(), &csv)?;
                println!("{}", path.display());
            }
            Ok(())
        }

        Commands::Preview { dataset, rows } => {
            let table = data.table(dataset);
            let text = format!(
                "{} ({} rows x {} funds)\n{}\n",
                cfg.sheets.name(dataset),
                table.len(),
                table.fund_count(),
                render::raw_table(table, rows)
            );
            emit(None, text.as_bytes())
        }
    }
}

/// Validates user-supplied fund names against the universe behind `kind`.
fn select(data: &FlowDataset, kind: DatasetKind, names: &[String]) -> anyhow::Result<IndexSet<FundId>> {
    let subset = data.funds_for(kind).select(names)?;
    // The universe spans both directions; keep only funds this table carries.
    let table = data.table(kind);
    Ok(subset
        .into_iter()
        .filter(|f| table.column(f.as_str()).is_some())
        .collect())
}

fn emit(output: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
