mod common;
use common::*;

use etf_flows::config::DashboardConfig;
use etf_flows::export::{DirectorySink, ExportSink, table_to_csv, to_csv};
use etf_flows::view::{FlowBasis, ValueScale, ViewRequest};
use etf_flows::{DatasetKind, FundId};

/// Parses exported CSV back into (header, rows of (date, cells)).
fn parse(bytes: &[u8]) -> (Vec<String>, Vec<(String, Vec<Option<f64>>)>) {
    let mut reader = csv::Reader::from_reader(bytes);
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            let cells = r
                .iter()
                .skip(1)
                .map(|f| (!f.is_empty()).then(|| f.parse::<f64>().unwrap()))
                .collect();
            (r[0].to_string(), cells)
        })
        .collect();
    (header, rows)
}

#[test]
fn exported_view_reads_back_to_same_values() {
    let data = load_bytes(reference_workbook(), &DashboardConfig::default()).unwrap();
    let request = ViewRequest {
        source: DatasetKind::Focus,
        basis: FlowBasis::Cumulative,
        scale: ValueScale::Percentage,
        funds: ["ARKF", "ARKK"].iter().filter_map(|f| FundId::new(f)).collect(),
    };
    let view = request.apply(&data).unwrap();
    let (header, rows) = parse(&to_csv(&view).unwrap());

    assert_eq!(header, vec!["Date", "ARKK", "ARKF"]);
    assert_eq!(rows.len(), view.dates().len());
    for (i, (date, cells)) in rows.iter().enumerate() {
        assert_eq!(date, &view.dates()[i].format("%Y-%m-%d").to_string());
        for (fund, cell) in view.funds().zip(cells) {
            assert_eq!(*cell, view.column(fund.as_str()).unwrap()[i]);
        }
    }
}

#[test]
fn raw_table_keeps_missing_cells_empty() {
    let data = load_bytes(reference_workbook(), &DashboardConfig::default()).unwrap();
    let csv = String::from_utf8(table_to_csv(&data.universe_outflow).unwrap()).unwrap();
    insta::assert_snapshot!(csv.trim_end(), @r"
    Date,TLT,SPY
    2024-01-02,-30,-10
    2024-01-03,,
    2024-01-04,-20,
    2024-01-05,,
    ");
}

#[test]
fn every_dataset_exports_to_its_own_file() {
    let data = load_bytes(reference_workbook(), &DashboardConfig::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path());

    for kind in DatasetKind::ALL {
        let csv = table_to_csv(data.table(kind)).unwrap();
        let path = sink.write(kind.file_stem(), &csv).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), csv);
    }

    let mut files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(
        files,
        vec!["ark_funds_flows.csv", "top100_inflows.csv", "top100_outflows.csv"]
    );
}
