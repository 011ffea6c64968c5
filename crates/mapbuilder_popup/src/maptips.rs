//! Text helpers used when a popup or map tip is shown for a feature.

use crate::info::{FieldFormat, MAX_PLACES, PopupInfo};
use chrono::{DateTime, Utc};
use mapbuilder_json::{JsonObject, JsonValue};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*br\s*/?\s*>|<\s*/\s*(?:p|div|li|tr)\s*>").expect("block break pattern is valid")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#x[0-9a-fA-F]+|[a-zA-Z]+);").expect("entity pattern is valid"));

static FIELD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("field token pattern is valid"));

/// Removes markup from an HTML fragment. Line-ending tags become newlines,
/// entities are decoded and blank lines are dropped.
pub fn strip_html(html: &str) -> String {
    let text = BLOCK_BREAK.replace_all(html, "\n");
    let text = TAG.replace_all(&text, "");
    let text = ENTITY.replace_all(&text, |caps: &Captures| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entity(name: &str) -> Option<String> {
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}

/// Display text of an attribute value.
///
/// Numbers honour `places` and `digit_separator`. Dates, and numbers when a
/// `date_format` is set (epoch milliseconds), use the named date format.
pub fn format_value(value: &JsonValue, format: Option<&FieldFormat>) -> String {
    let date_format = format.and_then(|f| f.date_format.as_deref());
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Date(date) => format_date(date, date_format),
        JsonValue::Number(n) => {
            if date_format.is_some() {
                if let Some(date) = n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis) {
                    return format_date(&date, date_format);
                }
            }
            let text = match format.and_then(|f| f.places) {
                Some(places) => format!("{:.*}", places.min(MAX_PLACES) as usize, n.as_f64()),
                None => n.to_string(),
            };
            if format.is_some_and(|f| f.digit_separator) {
                group_digits(&text)
            } else {
                text
            }
        }
        JsonValue::Array(items) => items
            .iter()
            .map(|item| format_value(item, format))
            .collect::<Vec<_>>()
            .join(", "),
        JsonValue::Object(_) => String::new(),
    }
}

fn format_date(date: &DateTime<Utc>, name: Option<&str>) -> String {
    let pattern = match name.unwrap_or("shortDate") {
        "shortDateShortTime" => "%m/%d/%Y %I:%M %p",
        "shortDateShortTime24" => "%m/%d/%Y %H:%M",
        "shortDateLongTime" => "%m/%d/%Y %I:%M:%S %p",
        "shortDateLongTime24" => "%m/%d/%Y %H:%M:%S",
        "longMonthDayYear" => "%B %-d, %Y",
        "dayShortMonthYear" => "%-d %b %Y",
        "longDate" => "%A, %B %-d, %Y",
        "longMonthYear" => "%B %Y",
        "shortMonthYear" => "%b %Y",
        "year" => "%Y",
        _ => "%m/%d/%Y",
    };
    date.format(pattern).to_string()
}

/// Inserts `,` between thousands in the integer part of a plain number.
fn group_digits(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (rest, None),
    };
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return text.to_string();
    }

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Replaces `{FIELD}` tokens with formatted attribute values. Field names
/// match case-insensitively; tokens naming a missing attribute become empty.
pub fn expand_title(template: &str, attributes: &JsonObject, popup: Option<&PopupInfo>) -> String {
    FIELD_TOKEN
        .replace_all(template, |caps: &Captures| {
            let name = caps[1].trim();
            let format = popup.and_then(|p| p.field_info(name)).and_then(|f| f.format.as_ref());
            attributes
                .get_ignore_case(name)
                .map(|value| format_value(value, format))
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1234567.891"), "1,234,567.891");
        assert_eq!(group_digits("-1000"), "-1,000");
        assert_eq!(group_digits("999"), "999");
        assert_eq!(group_digits("NaN"), "NaN");
    }

    #[test]
    fn test_decode_entity() {
        assert_eq!(decode_entity("amp").as_deref(), Some("&"));
        assert_eq!(decode_entity("#65").as_deref(), Some("A"));
        assert_eq!(decode_entity("#x41").as_deref(), Some("A"));
        assert_eq!(decode_entity("bogus"), None);
    }
}
