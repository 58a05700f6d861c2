#![allow(dead_code)]

use chrono::NaiveDate;
use etf_flows::config::DashboardConfig;
use etf_flows::loader::{WorkbookSource, load};
use etf_flows::{FlowDataset, LoadError};
use rust_xlsxwriter::{Format, Workbook};

/// One cell of a fixture sheet.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// Excel serial date written with a date number format.
    Serial(f64),
    Blank,
}

pub fn t(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

pub fn n(v: f64) -> Cell {
    Cell::Number(v)
}

pub struct SheetSpec {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

pub fn sheet(name: &str, rows: Vec<Vec<Cell>>) -> SheetSpec {
    SheetSpec {
        name: name.to_string(),
        rows,
    }
}

pub fn workbook_bytes(sheets: &[SheetSpec]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for spec in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&spec.name).expect("sheet name");
        for (r, row) in spec.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s).expect("write string");
                    }
                    Cell::Number(v) => {
                        worksheet.write_number(r, c, *v).expect("write number");
                    }
                    Cell::Serial(v) => {
                        worksheet
                            .write_number_with_format(r, c, *v, &date_format)
                            .expect("write date");
                    }
                    Cell::Blank => {}
                }
            }
        }
    }

    workbook.save_to_buffer().expect("xlsx bytes")
}

pub fn focus_sheet() -> SheetSpec {
    sheet(
        "ARK funds",
        vec![
            vec![t("Date"), t("ARKK"), t("ARKF")],
            vec![t("01/02/2024"), n(10.0), n(1.0)],
            vec![t("01/03/2024"), Cell::Blank, n(2.0)],
            vec![t("01/04/2024"), n(5.0), t("n/a")],
        ],
    )
}

pub fn inflow_sheet() -> SheetSpec {
    sheet(
        "top100 inflows",
        vec![
            vec![t("Date"), t("SPY"), t("QQQ")],
            vec![t("01/02/2024"), n(100.0), n(50.0)],
            vec![t("01/05/2024"), n(100.0), n(75.0)],
            vec![t("01/03/2024"), n(200.0), n(25.0)],
        ],
    )
}

pub fn outflow_sheet() -> SheetSpec {
    sheet(
        "top100 outflows",
        vec![
            vec![t("Date"), t("TLT"), t("SPY")],
            vec![t("01/02/2024"), n(-30.0), n(-10.0)],
            vec![t("01/04/2024"), n(-20.0), Cell::Blank],
        ],
    )
}

/// The three reference sheets: focus on Jan 2-4, inflows on Jan 2, 3 and 5
/// (stored out of order), outflows on Jan 2 and 4.
pub fn reference_workbook() -> Vec<u8> {
    workbook_bytes(&[focus_sheet(), inflow_sheet(), outflow_sheet()])
}

pub fn load_bytes(bytes: Vec<u8>, cfg: &DashboardConfig) -> Result<FlowDataset, LoadError> {
    load(&WorkbookSource::bytes("fixture.xlsx", bytes), cfg)
}

pub fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}
