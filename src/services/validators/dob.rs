use chrono::{NaiveDate, Utc};
use serde::Serialize;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Serialize)]
pub struct DobVerdict {
    pub valid: bool,
    pub formatted_date: Option<String>,
    pub verbal_date: Option<String>,
    pub message: String,
}

impl DobVerdict {
    fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            formatted_date: None,
            verbal_date: None,
            message: message.to_string(),
        }
    }
}

/// Validates a date of birth and produces both a zero-padded numeric form
/// and a spoken-style verbal form. Impossible dates, future dates, and ages
/// over 120 years all come back as non-exceptional invalid verdicts.
pub fn validate_date_of_birth(month: u32, day: u32, year: i32) -> DobVerdict {
    let date = match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => {
            return DobVerdict::invalid(
                "That doesn't appear to be a real calendar date. Please provide your date of birth again.",
            )
        }
    };

    let today = Utc::now().date_naive();
    if date > today {
        return DobVerdict::invalid(
            "That date is in the future. Please provide your correct date of birth.",
        );
    }

    let age_years = (today - date).num_days() as f64 / 365.25;
    if age_years > 120.0 {
        return DobVerdict::invalid("Please confirm your date of birth.");
    }

    let formatted = format!("{month:02}-{day:02}-{year}");
    let verbal = format!(
        "{} {day}{}, {year}",
        MONTH_NAMES[(month - 1) as usize],
        ordinal_suffix(day)
    );

    DobVerdict {
        valid: true,
        formatted_date: Some(formatted),
        message: format!("I have your date of birth as {verbal}. Is that correct?"),
        verbal_date: Some(verbal),
    }
}

/// Days 10-20 always take "th"; otherwise the suffix keys off the last digit.
fn ordinal_suffix(day: u32) -> &'static str {
    if (10..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
