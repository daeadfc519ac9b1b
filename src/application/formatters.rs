// Reading formatters - timestamps, fixed-point values and chart series
use crate::domain::dashboard::ChartPoint;
use crate::domain::reading::Reading;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Marker for absent values in direct display.
pub const NOT_AVAILABLE: &str = "N/A";
/// Chart label for readings without a timestamp.
pub const UNKNOWN_TIME: &str = "Unknown";
/// Rendered in place of a timestamp that does not parse.
pub const INVALID_DATE: &str = "Invalid Date";
/// Fixed correction applied to every stored timestamp (4h30).
pub const TIME_OFFSET_MINUTES: i64 = 270;
/// Number of trailing readings kept per chart.
pub const CHART_WINDOW: usize = 20;
pub const DEFAULT_PRECISION: usize = 2;
const MAX_PRECISION: usize = 100;
/// Fraction digits needed to print any finite f64 exactly.
const EXACT_DIGITS: usize = 1074;

/// Parse a store timestamp such as `2024-05-01_13:45:00` and apply the
/// fixed offset. Only the first underscore separates date from time; a
/// single space is accepted in its place.
pub fn parse_store_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let iso = raw.trim().replacen('_', "T", 1);
    let iso = if iso.contains('T') {
        iso
    } else {
        iso.replacen(' ', "T", 1)
    };
    let parsed = NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(&iso, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    parsed.checked_add_signed(Duration::minutes(TIME_OFFSET_MINUTES))
}

/// Medium date, short time: `Jan 1, 2024, 4:30 AM`.
pub fn format_date(timestamp: Option<&str>) -> String {
    match timestamp {
        None | Some("") => NOT_AVAILABLE.to_string(),
        Some(raw) => match parse_store_timestamp(raw) {
            Some(time) => time.format("%b %-d, %Y, %-I:%M %p").to_string(),
            None => INVALID_DATE.to_string(),
        },
    }
}

/// `HH:MM` label for chart axes. Unparseable input keeps the first five
/// characters of the invalid marker.
pub fn chart_label(timestamp: Option<&str>) -> String {
    match timestamp {
        None | Some("") => UNKNOWN_TIME.to_string(),
        Some(raw) => match parse_store_timestamp(raw) {
            Some(time) => time.format("%H:%M").to_string(),
            None => INVALID_DATE.chars().take(5).collect(),
        },
    }
}

/// Fixed-point rendering with exactly `precision` fraction digits.
pub fn format_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => to_fixed(v, precision),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Rounds half away from zero on the exact binary value, so 0.125 becomes
/// "0.13" while 1.005 (stored as 1.00499...) becomes "1.00".
fn to_fixed(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let precision = precision.min(MAX_PRECISION);

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(precision))
        .collect();
    let round_up = frac_part
        .as_bytes()
        .get(precision)
        .is_some_and(|d| *d >= b'5');

    if round_up {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - precision;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|d| *d as char));
    if precision > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|d| *d as char));
    }
    out
}

/// Chart series for one field over readings sorted oldest first.
///
/// Absent values chart as 0 rather than "N/A". Only the last `CHART_WINDOW`
/// entries are kept, by position: the input is trusted to be sorted and
/// already limited by the store query.
pub fn prepare_chart_data(readings: &[Reading], field: &str) -> Vec<ChartPoint> {
    let start = readings.len().saturating_sub(CHART_WINDOW);
    readings[start..]
        .iter()
        .map(|reading| {
            let value = reading
                .value_of(field)
                .filter(|v| !v.is_nan())
                .unwrap_or(0.0);
            ChartPoint::new(chart_label(reading.timestamp.as_deref()), value)
        })
        .collect()
}
