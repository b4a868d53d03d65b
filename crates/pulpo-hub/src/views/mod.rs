//! List computations behind the HTML pages. Everything here is pure: the
//! pages fetch records, hand them to these functions, and render the result.

pub mod dashboard;
pub mod inventory;
pub mod purchases;
pub mod tasks;

use chrono::{Datelike, NaiveDate};

/// Distinct non-empty values, in the order they are first seen.
pub fn distinct_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// `d/m/yyyy`, as Spanish locales print short dates.
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

const MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// `dd mmm yyyy` with Spanish month abbreviations, e.g. `05 sept 2024`.
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Parse the date part of an ISO date or datetime.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_keeps_first_seen_order() {
        let values = distinct_values(["Bebidas", "", "Cocina", "Bebidas", "Limpieza"]);
        assert_eq!(values, vec!["Bebidas", "Cocina", "Limpieza"]);
    }

    #[test]
    fn spanish_date_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 5).unwrap();
        assert_eq!(format_short_date(date), "5/9/2024");
        assert_eq!(format_long_date(date), "05 sept 2024");
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(format_long_date(date), "31 dic 2025");
    }

    #[test]
    fn parses_dates_and_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 10);
        assert_eq!(parse_iso_date("2024-05-10"), expected);
        assert_eq!(parse_iso_date("2024-05-10T08:00:00.000Z"), expected);
        assert_eq!(parse_iso_date("mañana"), None);
    }
}
