use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;

/// Marker used for Saturdays that are worked to bridge a long holiday.
pub const MAKEUP_WORKDAY: &str = "Make-up Workday";

static HOLIDAYS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // 2024
        ("2024-01-01", "New Year's Day"),
        ("2024-02-08", "Lunar New Year Holiday"),
        ("2024-02-09", "Lunar New Year's Eve"),
        ("2024-02-10", "Lunar New Year"),
        ("2024-02-11", "Lunar New Year"),
        ("2024-02-12", "Lunar New Year"),
        ("2024-02-13", "Lunar New Year Holiday"),
        ("2024-02-14", "Lunar New Year Holiday"),
        ("2024-02-17", MAKEUP_WORKDAY),
        ("2024-02-28", "Peace Memorial Day"),
        ("2024-04-04", "Children's Day"),
        ("2024-04-05", "Tomb Sweeping Day"),
        ("2024-05-01", "Labor Day"),
        ("2024-06-10", "Dragon Boat Festival"),
        ("2024-09-17", "Mid-Autumn Festival"),
        ("2024-10-10", "National Day"),
        // 2025
        ("2025-01-01", "New Year's Day"),
        ("2025-01-27", "Lunar New Year Holiday"),
        ("2025-01-28", "Lunar New Year's Eve"),
        ("2025-01-29", "Lunar New Year"),
        ("2025-01-30", "Lunar New Year"),
        ("2025-01-31", "Lunar New Year"),
        ("2025-02-08", MAKEUP_WORKDAY),
        ("2025-02-28", "Peace Memorial Day"),
        ("2025-04-03", "Children's Day (observed)"),
        ("2025-04-04", "Children's Day / Tomb Sweeping Day"),
        ("2025-05-01", "Labor Day"),
        ("2025-05-30", "Dragon Boat Festival (observed)"),
        ("2025-05-31", "Dragon Boat Festival"),
        ("2025-09-29", "Teachers' Day (observed)"),
        ("2025-10-06", "Mid-Autumn Festival"),
        ("2025-10-10", "National Day"),
        ("2025-10-24", "Retrocession Day (observed)"),
        ("2025-12-25", "Constitution Day"),
        // 2026
        ("2026-01-01", "New Year's Day"),
        ("2026-02-16", "Lunar New Year's Eve"),
        ("2026-02-17", "Lunar New Year"),
        ("2026-02-18", "Lunar New Year"),
        ("2026-02-19", "Lunar New Year"),
        ("2026-02-20", "Lunar New Year Holiday"),
        ("2026-02-27", "Peace Memorial Day (observed)"),
        ("2026-04-03", "Children's Day (observed)"),
        ("2026-04-06", "Tomb Sweeping Day (observed)"),
        ("2026-05-01", "Labor Day"),
        ("2026-06-19", "Dragon Boat Festival"),
        ("2026-09-25", "Mid-Autumn Festival"),
        ("2026-09-28", "Teachers' Day"),
        ("2026-10-09", "National Day (observed)"),
        ("2026-10-26", "Retrocession Day (observed)"),
        ("2026-12-25", "Constitution Day"),
    ]
    .into_iter()
    .collect()
});

pub fn holiday_name(date: NaiveDate) -> Option<&'static str> {
    HOLIDAYS.get(date.format("%Y-%m-%d").to_string().as_str()).copied()
}

pub fn is_makeup_workday(date: NaiveDate) -> bool {
    holiday_name(date) == Some(MAKEUP_WORKDAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn lookup_is_by_exact_date() {
        assert_eq!(holiday_name(d("2025-10-10")), Some("National Day"));
        assert_eq!(holiday_name(d("2025-10-11")), None);
        assert_eq!(holiday_name(d("2019-01-01")), None);
    }

    #[test]
    fn makeup_workdays_are_flagged() {
        assert!(is_makeup_workday(d("2025-02-08")));
        assert!(!is_makeup_workday(d("2025-01-01")));
    }
}
