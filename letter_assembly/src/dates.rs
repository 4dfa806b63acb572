//! Parsing of submission dates.

use chrono::NaiveDate;

use crate::errors::{DateParseError, DateParseSnafu};

/// The accepted date formats, tried in order; the first match wins.
///
/// Every format spells the month out, so there is no DD/MM versus MM/DD
/// ambiguity to resolve. Month names match case-insensitively.
const DATE_FORMATS: [&str; 3] = ["%b %d, %Y", "%B %d, %Y", "%d %b %Y"];

/// Parses a date such as `Jan 05, 2023`, `January 5, 2023` or `5 Jan 2023`.
///
/// There is no fallback value: text that matches no format is an error and
/// the caller is expected to reject the corresponding row.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = text.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    DateParseSnafu { text: trimmed }.fail()
}
