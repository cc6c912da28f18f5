//! Time related utils.

use chrono::Utc;

/// DateTime is an alias of `chrono::DateTime<chrono::Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime into an http date: `Mon, 15 Aug 2022 16:50:12 GMT`.
///
/// This is the format azure storage expects in the `x-ms-date` header.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
