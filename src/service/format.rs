//! Spanish (es-ES) display formatting for numbers, dates and booleans.

use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Sí"
    } else {
        "No"
    }
}

/// "15 de enero de 2024"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// "15/1/2024"
pub fn short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Grouped number with at most three fraction digits: "12.345,5".
/// es-ES leaves four-digit integers ungrouped ("1234").
pub fn grouped_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut int_grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let group = digits.len() >= 5;
    for (i, c) in digits.iter().enumerate() {
        if group && i > 0 && (digits.len() - i) % 3 == 0 {
            int_grouped.push('.');
        }
        int_grouped.push(*c);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&int_grouped);
    if !frac.is_empty() {
        out.push(',');
        out.push_str(frac);
    }
    out
}
