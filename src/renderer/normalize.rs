//! Conversions from raw record strings to the tree's field syntax.

use crate::parser::GedDate;

/// Rewrite a GEDCOM date into `YYYY-MM-DD` style, `(ca)`, `/` interval syntax.
///
/// Anything outside the date grammar comes back untouched.
pub fn normalize_date(raw: &str) -> String {
    match GedDate::parse(raw) {
        Some(date) => date.to_string(),
        None => raw.to_string(),
    }
}

/// Keep the most specific element of a comma separated place hierarchy.
pub fn normalize_place(raw: &str) -> String {
    raw.split(',').next().unwrap_or_default().trim().to_string()
}

/// Mark up the `/Surname/` and `"Nickname"` spans of a display name.
pub fn normalize_name(raw: &str) -> String {
    let name = wrap_first_span(raw.trim(), '/', "surn");
    wrap_first_span(&name, '"', "nick")
}

pub fn escape_ampersand(text: &str) -> String {
    text.replace('&', "\\&")
}

fn wrap_first_span(text: &str, delimiter: char, macro_name: &str) -> String {
    let Some(open) = text.find(delimiter) else {
        return text.to_string();
    };
    let body_start = open + delimiter.len_utf8();
    let Some(len) = text[body_start..].find(delimiter) else {
        return text.to_string();
    };
    let close = body_start + len;

    format!(
        "{}\\{}{{{}}}{}",
        &text[..open],
        macro_name,
        &text[body_start..close],
        &text[close + delimiter.len_utf8()..]
    )
}
