use chrono::{Datelike, Days, Local, NaiveDate};

use crate::error::ValidationError;

/// Fixed gestation interval used to estimate birth from the mating date
pub const GESTATION_DAYS: u64 = 150;

/// Shown wherever a date or age is not recorded
pub const DATE_PLACEHOLDER: &str = "-";

/// Month length used by the age approximation
const DAYS_PER_MONTH: i64 = 30;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun",
    "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Abbreviated `id-ID` month name for a 1-based month number
pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    MONTH_ABBREVIATIONS.get(month.checked_sub(1)? as usize).copied()
}

/// Format a date the way the `id-ID` locale renders a short date, e.g. `05 Jan 2024`
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!(
            "{:02} {} {}",
            date.day(),
            month_abbreviation(date.month()).unwrap_or_default(),
            date.year()
        ),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

/// Whole 30-day months elapsed between `birth_date` and `today`.
///
/// Birth dates in the future count as zero months.
pub fn age_in_months(birth_date: NaiveDate, today: NaiveDate) -> i64 {
    let elapsed_days = (today - birth_date).num_days();
    elapsed_days.max(0) / DAYS_PER_MONTH
}

/// Age label shown next to the birth date, e.g. `7 bln`
pub fn get_age(birth_date: Option<NaiveDate>, today: NaiveDate) -> String {
    match birth_date {
        Some(birth_date) => format!("{} bln", age_in_months(birth_date, today)),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

/// Estimated birth date for a mating date
pub fn estimate_birth(mating_date: Option<NaiveDate>) -> Option<NaiveDate> {
    mating_date?.checked_add_days(Days::new(GESTATION_DAYS))
}

/// Parse a `YYYY-MM-DD` form value. Blank input is absent.
pub fn parse_date(field: &'static str, raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

/// Render a date as a form input value (`YYYY-MM-DD`), blank when absent
pub fn to_input_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
