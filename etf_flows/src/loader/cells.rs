//! Coercion of raw spreadsheet cells into dates and flow amounts.

use calamine::Data;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

/// Day zero of the 1900 date system as Excel counts it (leap-year bug included).
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// 9999-12-31, the last date Excel can represent.
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

const DATETIME_TEXT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Coerces a date-column cell. `formats` are tried, in order, for text cells.
pub(crate) fn parse_date(cell: &Data, formats: &[String]) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) | Data::String(s) => parse_date_text(s, formats),
        Data::Float(f) => from_excel_serial(*f),
        Data::Int(i) => from_excel_serial(*i as f64),
        _ => None,
    }
}

fn parse_date_text(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_TEXT_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Coerces a flow cell. Blank, boolean, error, non-numeric and non-finite
/// cells are missing.
pub(crate) fn parse_flow(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => parse_flow_text(s)?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Accepts `1234.5`, `1,234.5`, `$1,234.5`, `-$12`, and accounting-style `(12.5)`.
fn parse_flow_text(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let (negative, body) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => match s.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, s),
        },
    };
    let body = body.strip_prefix('$').unwrap_or(body).trim();
    if body.is_empty() || (negative && body.starts_with(['-', '+'])) {
        return None;
    }
    let cleaned: String = body.chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Text form of a cell for error messages and header labels.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<String> {
        vec!["%m/%d/%Y".into(), "%Y-%m-%d".into()]
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn text_dates_follow_configured_formats() {
        let f = formats();
        assert_eq!(parse_date(&Data::String("01/02/2024".into()), &f), Some(ymd(2024, 1, 2)));
        assert_eq!(parse_date(&Data::String(" 2024-01-02 ".into()), &f), Some(ymd(2024, 1, 2)));
        assert_eq!(
            parse_date(&Data::String("2024-01-02 00:00:00".into()), &f),
            Some(ymd(2024, 1, 2))
        );
        assert_eq!(
            parse_date(&Data::DateTimeIso("2024-01-02T00:00:00".into()), &f),
            Some(ymd(2024, 1, 2))
        );
        assert_eq!(parse_date(&Data::String("02.01.2024".into()), &f), None);
        assert_eq!(parse_date(&Data::String("".into()), &f), None);
    }

    #[test]
    fn numeric_dates_are_excel_serials() {
        let f = formats();
        assert_eq!(parse_date(&Data::Float(45292.0), &f), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_date(&Data::Int(45293), &f), Some(ymd(2024, 1, 2)));
        assert_eq!(parse_date(&Data::Float(-3.0), &f), None);
        assert_eq!(parse_date(&Data::Int(20240102), &f), None);
        assert_eq!(parse_date(&Data::Bool(true), &f), None);
        assert_eq!(parse_date(&Data::Empty, &f), None);
    }

    #[test]
    fn flows_coerce_numbers_and_text() {
        assert_eq!(parse_flow(&Data::Float(-12.5)), Some(-12.5));
        assert_eq!(parse_flow(&Data::Int(7)), Some(7.0));
        assert_eq!(parse_flow(&Data::String(" 1,234.5 ".into())), Some(1234.5));
        assert_eq!(parse_flow(&Data::String("$2,000".into())), Some(2000.0));
        assert_eq!(parse_flow(&Data::String("-$12".into())), Some(-12.0));
        assert_eq!(parse_flow(&Data::String("(12.5)".into())), Some(-12.5));
    }

    #[test]
    fn non_numeric_flows_are_missing_not_zero() {
        assert_eq!(parse_flow(&Data::Empty), None);
        assert_eq!(parse_flow(&Data::String("".into())), None);
        assert_eq!(parse_flow(&Data::String("n/a".into())), None);
        assert_eq!(parse_flow(&Data::String("--5".into())), None);
        assert_eq!(parse_flow(&Data::String("NaN".into())), None);
        assert_eq!(parse_flow(&Data::Float(f64::INFINITY)), None);
        assert_eq!(parse_flow(&Data::Bool(false)), None);
    }

    #[test]
    fn blank_cells() {
        assert!(is_blank(&Data::Empty));
        assert!(is_blank(&Data::String("  ".into())));
        assert!(!is_blank(&Data::Float(0.0)));
    }
}
