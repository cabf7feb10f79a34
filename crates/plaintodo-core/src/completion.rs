use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Render `date` in the sortable `YYYY-MM-DD` form used for completion stamps.
///
/// # Errors
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(DATE_FORMAT)
}

/// Prefix `line` with a completion date.
#[must_use]
pub fn stamp(line: &str, date: &str) -> String {
    format!("{date} {line}")
}

/// Drop the first whitespace-delimited field (the completion date) of `line`
/// and the single separator after it, so [`stamp`] round-trips exactly.
///
/// A line that holds only the date yields an empty line.
#[must_use]
pub fn unstamp(line: &str) -> String {
    line.trim_start()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.to_owned())
        .unwrap_or_default()
}
