//! Display Formatting
//!
//! Pure functions turning raw stats values into display strings.
//! Numbers use en-US grouping; dates use Russian textual conventions.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::client::models::Period;

/// Maximum fraction digits shown by [`format_number`]
const MAX_FRACTION_DIGITS: usize = 3;

/// Thousands-grouped number, up to three fraction digits.
///
/// `1234567.0` → `"1,234,567"`, `1234.5` → `"1,234.5"`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "∞".to_string()
        } else {
            "-∞".to_string()
        };
    }

    let rendered = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(rendered.len() + rendered.len() / 3 + 1);
    // Rounding can turn a tiny negative into zero; no "-0"
    if value < 0.0 && (int_part.bytes().any(|b| b != b'0') || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Percent with one decimal place: `4.5` → `"4.5%"`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", unsigned_zero(value))
}

/// Signed percent change: `12.5` → `"+12.5%"`, `-8.0` → `"-8.0%"`, `0` → `"0.0%"`
pub fn format_change(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, unsigned_zero(value))
}

/// Maps `-0.0` to `0.0`, which Rust would otherwise print as `-0.0`
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Axis label for a `YYYY-MM-DD` date in the given period.
///
/// - 7 days: short weekday and day (`пн, 14`)
/// - 30 days: day and abbreviated month (`14 окт.`)
/// - 3 months: abbreviated month (`окт.`)
///
/// Input that is not a valid date is returned unchanged.
pub fn format_chart_date(date: &str, period: Period) -> String {
    let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return date.to_string();
    };

    match period {
        Period::SevenDays => format!("{}, {}", weekday_short(d.weekday()), d.day()),
        Period::ThirtyDays => format!("{} {}", d.day(), month_short_genitive(d.month())),
        Period::ThreeMonths => month_short_standalone(d.month()).to_string(),
    }
}

fn weekday_short(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "пн",
        Weekday::Tue => "вт",
        Weekday::Wed => "ср",
        Weekday::Thu => "чт",
        Weekday::Fri => "пт",
        Weekday::Sat => "сб",
        Weekday::Sun => "вс",
    }
}

/// Month form used after a day number ("14 окт.", "1 мая")
fn month_short_genitive(month: u32) -> &'static str {
    match month {
        1 => "янв.",
        2 => "февр.",
        3 => "мар.",
        4 => "апр.",
        5 => "мая",
        6 => "июн.",
        7 => "июл.",
        8 => "авг.",
        9 => "сент.",
        10 => "окт.",
        11 => "нояб.",
        _ => "дек.",
    }
}

/// Month form used on its own
fn month_short_standalone(month: u32) -> &'static str {
    match month {
        1 => "янв.",
        2 => "февр.",
        3 => "март",
        4 => "апр.",
        5 => "май",
        6 => "июнь",
        7 => "июль",
        8 => "авг.",
        9 => "сент.",
        10 => "окт.",
        11 => "нояб.",
        _ => "дек.",
    }
}
