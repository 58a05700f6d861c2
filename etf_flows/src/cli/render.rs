//! Text tables for terminal output.

use comfy_table::{Table, presets::UTF8_FULL};

use crate::models::{
    dataset::FlowDataset,
    flow_table::FlowTable,
    fund::FundUniverse,
};
use crate::view::{ValueScale, ViewResult};

const MISSING: &str = "-";

fn fmt_value(v: Option<f64>, scale: ValueScale) -> String {
    match (v, scale) {
        (None, _) => MISSING.to_string(),
        (Some(v), ValueScale::Absolute) => format!("{v:.2}"),
        (Some(v), ValueScale::Percentage) => format!("{:.1}%", v * 100.0),
    }
}

pub(crate) fn view_table(view: &ViewResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["Date".to_string()];
    header.extend(view.funds().map(|f| f.to_string()));
    header.push("Total".to_string());
    table.set_header(header);

    for (i, date) in view.dates().iter().enumerate() {
        let mut row = vec![date.format("%Y-%m-%d").to_string()];
        row.extend(view.series().values().map(|s| fmt_value(s[i], view.scale)));
        row.push(fmt_value(view.totals()[i], ValueScale::Absolute));
        table.add_row(row);
    }
    table
}

pub(crate) fn raw_table(flows: &FlowTable, max_rows: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["Date".to_string()];
    header.extend(flows.funds().map(|f| f.to_string()));
    table.set_header(header);

    for (i, date) in flows.dates().iter().enumerate().take(max_rows) {
        let mut row = vec![date.format("%Y-%m-%d").to_string()];
        row.extend(
            flows
                .columns()
                .values()
                .map(|s| fmt_value(s[i], ValueScale::Absolute)),
        );
        table.add_row(row);
    }
    table
}

pub(crate) fn fund_lists(dataset: &FlowDataset) -> String {
    fn line(u: &FundUniverse) -> String {
        let funds: Vec<&str> = u.funds().iter().map(|f| f.as_str()).collect();
        format!("{} ({}): {}", u.name(), u.len(), funds.join(", "))
    }
    format!("{}\n{}\n", line(&dataset.focus_funds), line(&dataset.universe))
}
