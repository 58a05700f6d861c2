mod common;
use common::*;

use etf_flows::compare::{FlowDirection, compare};
use etf_flows::config::DashboardConfig;
use etf_flows::loader::WorkbookSource;
use etf_flows::snapshot::SnapshotStore;
use etf_flows::view::{FlowBasis, ValueScale};
use etf_flows::{FundId, LoadError, ViewError};
use indexmap::IndexSet;

fn subset(names: &[&str]) -> IndexSet<FundId> {
    names.iter().filter_map(|n| FundId::new(n)).collect()
}

#[test]
fn cumulative_outflow_comparison_over_loaded_workbook() {
    let cfg = DashboardConfig::default();
    let data = load_bytes(reference_workbook(), &cfg).unwrap();

    let view = compare(
        &data,
        &cfg,
        FlowDirection::Outflows,
        FlowBasis::Cumulative,
        ValueScale::Absolute,
        Some(&subset(&["ARKK"])),
        None,
    )
    .unwrap();

    assert_eq!(
        view.title,
        "ARK Funds vs Top 100 ETFs Outflows - Cumulative Flows (Absolute Value)"
    );
    assert_eq!(view.y_axis_title, "Cumulative Flow Value ($ Millions)");
    assert_eq!(
        view.focus.column("ARKK").unwrap(),
        &[Some(10.0), Some(10.0), Some(15.0), Some(15.0)]
    );
    assert_eq!(
        view.universe.column("TLT").unwrap(),
        &[Some(-30.0), Some(-30.0), Some(-50.0), Some(-50.0)]
    );
    assert_eq!(view.universe.totals()[0], Some(-40.0));
    assert_eq!(view.palette.len(), 1);
    assert_eq!(view.palette.get("ARKK").map(String::as_str), Some("#FF6B6B"));
}

#[test]
fn comparison_serializes_for_chart_clients() {
    let cfg = DashboardConfig::default();
    let data = load_bytes(reference_workbook(), &cfg).unwrap();
    let view = compare(
        &data,
        &cfg,
        FlowDirection::Inflows,
        FlowBasis::Daily,
        ValueScale::Percentage,
        None,
        Some(&subset(&["QQQ"])),
    )
    .unwrap();

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["direction"], "inflows");
    assert_eq!(json["y_axis_title"], "Share of Total (%)");
    assert_eq!(json["universe"]["series"]["QQQ"][0], 1.0);
    assert_eq!(json["universe"]["series"]["QQQ"][2], serde_json::Value::Null);
    assert_eq!(json["focus"]["dates"][0], "2024-01-02");
}

#[test]
fn empty_focus_subset_fails_comparison() {
    let cfg = DashboardConfig::default();
    let data = load_bytes(reference_workbook(), &cfg).unwrap();
    let err = compare(
        &data,
        &cfg,
        FlowDirection::Inflows,
        FlowBasis::Daily,
        ValueScale::Absolute,
        Some(&IndexSet::new()),
        None,
    )
    .unwrap_err();
    assert_eq!(err, ViewError::InvalidSubset);
}

#[test]
fn reload_swaps_snapshot_and_keeps_it_on_failure() {
    let cfg = DashboardConfig::default();
    let store = SnapshotStore::open(
        &WorkbookSource::bytes("first.xlsx", reference_workbook()),
        &cfg,
    )
    .unwrap();
    let before = store.current();
    assert_eq!(before.focus.fund_count(), 2);

    let wider = sheet(
        "ARK funds",
        vec![
            vec![t("Date"), t("ARKK"), t("ARKF"), t("ARKG")],
            vec![t("01/02/2024"), n(1.0), n(2.0), n(3.0)],
        ],
    );
    let next = workbook_bytes(&[wider, inflow_sheet(), outflow_sheet()]);
    store
        .reload(&WorkbookSource::bytes("second.xlsx", next), &cfg)
        .unwrap();
    assert_eq!(store.generation(), 1);
    assert_eq!(store.current().focus.fund_count(), 3);
    assert_eq!(store.current().source, "second.xlsx");
    // Readers holding the old snapshot are unaffected.
    assert_eq!(before.focus.fund_count(), 2);

    let broken = workbook_bytes(&[focus_sheet(), inflow_sheet()]);
    let err = store
        .reload(&WorkbookSource::bytes("third.xlsx", broken), &cfg)
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingSheet { .. }));
    assert_eq!(store.generation(), 1);
    assert_eq!(store.current().source, "second.xlsx");
}
