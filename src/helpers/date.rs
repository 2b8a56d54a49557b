//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone};

const PT_BR_MONTHS: [(&str, &str); 12] = [
    ("janeiro", "jan"),
    ("fevereiro", "fev"),
    ("março", "mar"),
    ("abril", "abr"),
    ("maio", "mai"),
    ("junho", "jun"),
    ("julho", "jul"),
    ("agosto", "ago"),
    ("setembro", "set"),
    ("outubro", "out"),
    ("novembro", "nov"),
    ("dezembro", "dez"),
];

/// Format a date using a Moment.js-compatible format string.
///
/// Month names follow `language`; `pt-BR` yields the lowercase Portuguese
/// names the site displays, anything else falls back to chrono's English.
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY", "pt-BR") // -> "15 mar 2021"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str, language: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut chrono_format = moment_to_chrono_format(format);

    if is_portuguese(language) {
        let (full, short) = PT_BR_MONTHS[date.month0() as usize];
        chrono_format = chrono_format.replace("%B", full).replace("%b", short);
    }

    date.format(&chrono_format).to_string()
}

/// Format an optional publication date, `-` when the post was never published
pub fn format_optional_date<Tz: TimeZone>(
    date: Option<&DateTime<Tz>>,
    format: &str,
    language: &str,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.map(|d| format_date(d, format, language))
        .unwrap_or_else(|| "-".to_string())
}

fn is_portuguese(language: &str) -> bool {
    language.eq_ignore_ascii_case("pt-br") || language.eq_ignore_ascii_case("pt")
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each category
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
