//! Attribute value formatting shared by writers and readers.

use mapbuilder_model::{BrushPoint, Color};

pub fn bool_str(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Shortest text that parses back to the same value, never in exponent form.
pub fn fmt_f64(value: f64) -> String {
    format!("{value}")
}

pub fn parse_f64(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => text.parse().ok(),
    }
}

pub fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

pub fn split_strings(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn split_i32(text: &str) -> Option<Vec<i32>> {
    split_strings(text).iter().map(|s| s.parse().ok()).collect()
}

pub fn point_str(point: &BrushPoint) -> String {
    format!("{},{}", fmt_f64(point.x), fmt_f64(point.y))
}

pub fn parse_point(text: &str) -> Option<BrushPoint> {
    let (x, y) = text.split_once(',')?;
    Some(BrushPoint::new(parse_f64(x)?, parse_f64(y)?))
}

pub fn color_str(color: &Color) -> String {
    color.to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_lists() {
        assert_eq!(fmt_f64(0.5), "0.5");
        assert_eq!(fmt_f64(20.0), "20");
        assert_eq!(parse_f64(" 1.25 "), Some(1.25));
        assert_eq!(split_i32("0, 2,5"), Some(vec![0, 2, 5]));
        assert_eq!(split_i32("0,a"), None);
        assert_eq!(join(&[1, 2, 3]), "1,2,3");
        assert_eq!(parse_point("0.5,1"), Some(BrushPoint::new(0.5, 1.0)));
        assert_eq!(parse_bool("True"), Some(true));
    }
}
