//! Cell values and their rendering as SQL literals.

use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Whole floats beyond this magnitude lose integer precision.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Duration(TimeDelta),
}

/// How embedded single quotes are escaped inside text literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum QuoteEscape {
    /// `'` becomes `"`. Lossy, but matches scripts produced by earlier tooling.
    #[default]
    Legacy,
    /// `'` becomes `''`, the SQL-standard escape.
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Null,
    Text(&'a str),
    Integer(i64),
    Float(u64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Duration(i64),
}

impl CellValue {
    /// Whole-number floats become integers; error cells and NaN are null.
    /// Serial dates assume the 1900 date system.
    pub fn from_sheet_cell(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Null,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Integer(*i),
            Data::Float(f) => from_float(*f),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                if dt.is_duration() {
                    CellValue::Duration(duration_from_serial(serial))
                } else {
                    datetime_from_serial(serial)
                        .map(CellValue::DateTime)
                        .unwrap_or(CellValue::Float(serial))
                }
            }
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn key(&self) -> CellKey<'_> {
        match self {
            CellValue::Null => CellKey::Null,
            CellValue::Text(s) => CellKey::Text(s),
            CellValue::Integer(i) => CellKey::Integer(*i),
            CellValue::Float(f) => CellKey::Float(f.to_bits()),
            CellValue::Boolean(b) => CellKey::Boolean(*b),
            CellValue::DateTime(dt) => CellKey::DateTime(*dt),
            CellValue::Duration(d) => CellKey::Duration(d.num_milliseconds()),
        }
    }

    /// Plain rendering without SQL quoting, used for header labels.
    pub fn as_display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            CellValue::Duration(d) => format_duration(*d),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

pub fn format_sql_literal(value: &CellValue, escape: QuoteEscape) -> String {
    match value {
        CellValue::Null => "NULL".to_string(),
        CellValue::Text(s) => {
            let escaped = match escape {
                QuoteEscape::Legacy => s.replace('\'', "\""),
                QuoteEscape::Standard => s.replace('\'', "''"),
            };
            format!("'{escaped}'")
        }
        CellValue::DateTime(_) | CellValue::Duration(_) => format!("'{}'", value.as_display()),
        CellValue::Float(f) if f.is_nan() => "NULL".to_string(),
        CellValue::Float(f) if f.is_infinite() => {
            if f.is_sign_positive() {
                "'Infinity'".to_string()
            } else {
                "'-Infinity'".to_string()
            }
        }
        CellValue::Integer(_) | CellValue::Float(_) | CellValue::Boolean(_) => value.as_display(),
    }
}

fn from_float(value: f64) -> CellValue {
    if value.is_nan() {
        CellValue::Null
    } else if value.fract() == 0.0 && value.abs() <= MAX_EXACT_FLOAT_INT {
        CellValue::Integer(value as i64)
    } else {
        CellValue::Float(value)
    }
}

fn datetime_from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    // Serials below 60 precede Excel's phantom 1900-02-29.
    let epoch = if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

fn duration_from_serial(serial: f64) -> TimeDelta {
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    TimeDelta::try_milliseconds(millis).unwrap_or(TimeDelta::zero())
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// `[-]H:MM:SS[.mmm]`, a form PostgreSQL accepts as an interval.
fn format_duration(duration: TimeDelta) -> String {
    let sign = if duration < TimeDelta::zero() { "-" } else { "" };
    let total_millis = duration.num_milliseconds().unsigned_abs();
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if millis == 0 {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}
