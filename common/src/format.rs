//! Attribute value formatting

use crate::record::CellValue;

/// Two-decimal rendering of a numeric attribute.
///
/// Absent, empty or unparseable values yield `None`.
pub fn format_decimal(value: Option<&CellValue>) -> Option<String> {
    let number = match value? {
        CellValue::Empty => return None,
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    if !number.is_finite() {
        return None;
    }
    Some(format!("{:.2}", number))
}

/// Trimmed text of an attribute, `None` when nothing is left.
pub fn clean_text(value: Option<&CellValue>) -> Option<String> {
    let text = value?.to_text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
