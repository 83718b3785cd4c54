use crate::types::{ClassifiedRow, NumericParse, NumericResult, ReferenceRange};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// Unsigned decimal, with or without integer part
const NUMBER: &str = r"(\d+(?:\.\d+)?|\.\d+)";

fn bare_number_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^([+-]?(?:\d+(?:\.\d+)?|\.\d+))$").expect("Failed to compile regex")
    })
}

fn multiplier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        let pattern = format!(r"(?i)^{NUMBER}\s*[x×]\s*{NUMBER}\s*(?:\^\s*([+-]?\d+))?$");
        Regex::new(&pattern).expect("Failed to compile regex")
    })
}

fn range_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        let pattern = format!(r"^{NUMBER}\s*[-–]\s*{NUMBER}$");
        Regex::new(&pattern).expect("Failed to compile regex")
    })
}

/// Parses a result cell into a base and multiplier
///
/// Accepts:
/// - a bare decimal: `"52"`, `"11.3"` (multiplier 1)
/// - multiplier notation: `"3.83x10^3"`, `"5.6 X 10 ^ 9"`, `"2x10"`
///   (multiplier = factor ^ exponent, exponent defaulting to 1)
///
/// Anything else, including empty input, is [`NumericParse::Unparseable`].
pub fn process_result(raw: &str) -> NumericParse {
    let s = raw.trim();
    if s.is_empty() {
        return NumericParse::Unparseable;
    }

    let parsed = if let Some(caps) = bare_number_regex().captures(s) {
        caps[1]
            .parse::<f64>()
            .ok()
            .map(|base| NumericResult::new(base, 1.0))
    } else if let Some(caps) = multiplier_regex().captures(s) {
        parse_multiplier(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()))
    } else {
        None
    };

    match parsed {
        Some(result) if result.value().is_finite() => NumericParse::Value(result),
        _ => {
            debug!("Unparseable result value: {:?}", raw);
            NumericParse::Unparseable
        }
    }
}

fn parse_multiplier(base: &str, factor: &str, exponent: Option<&str>) -> Option<NumericResult> {
    let base: f64 = base.parse().ok()?;
    let factor: f64 = factor.parse().ok()?;
    let exponent: i32 = match exponent {
        Some(e) => e.parse().ok()?,
        None => 1,
    };
    Some(NumericResult::new(base, factor.powi(exponent)))
}

/// Parses a `low - high` reference range and scales both bounds
///
/// Returns `None` for empty or malformed ranges; the result is kept without
/// a range in that case.
pub fn process_reference_range(raw: &str, multiplier: f64) -> Option<ReferenceRange> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let Some(caps) = range_regex().captures(s) else {
        debug!("Unparseable reference range: {:?}", raw);
        return None;
    };

    let low: f64 = caps[1].parse().ok()?;
    let high: f64 = caps[2].parse().ok()?;
    let range = ReferenceRange::new(low, high).scaled(multiplier);

    if range.low().is_finite() && range.high().is_finite() {
        Some(range)
    } else {
        None
    }
}

/// Classified row with its value normalized
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub category: String,
    pub numeric: NumericResult,
    pub unit: Option<String>,
    pub reference_range: Option<ReferenceRange>,
}

/// Normalizes a classified row's result and reference range
///
/// Returns `None` when the result is missing or unparseable. The unit passes
/// through unchanged.
pub fn normalize_row(row: &ClassifiedRow) -> Option<NormalizedRow> {
    let numeric = match row.result.as_deref().map(process_result) {
        Some(NumericParse::Value(numeric)) => numeric,
        _ => {
            debug!(
                "Dropping '{}' ({}): no numeric result",
                row.category, row.source_label
            );
            return None;
        }
    };

    let reference_range = row
        .reference_range
        .as_deref()
        .and_then(|range| process_reference_range(range, numeric.multiplier));

    Some(NormalizedRow {
        category: row.category.clone(),
        numeric,
        unit: row.unit.clone(),
        reference_range,
    })
}
