//! Prediction result record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single prediction produced from one form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Unique prediction identifier
    pub prediction_id: String,

    /// Name of the predicted quantity
    pub target: String,

    /// Raw predicted value
    pub value: f64,

    /// Display form of the value, thousands-grouped with two decimals
    pub formatted: String,

    /// Model that produced the value
    pub model: String,

    /// Input values used, keyed by feature name
    pub inputs: BTreeMap<String, f64>,

    /// Generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl Prediction {
    /// Create a new prediction record
    pub fn new(target: String, value: f64, model: String, inputs: BTreeMap<String, f64>) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            target,
            value,
            formatted: format_amount(value),
            model,
            inputs,
            timestamp: Utc::now(),
        }
    }
}

/// Format a value with thousands grouping and two decimals,
/// e.g. `1234567.5` becomes `1,234,567.50`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }

    let rendered = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if value < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.0), "999.00");
        assert_eq!(format_amount(1000.0), "1,000.00");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
    }

    #[test]
    fn test_format_amount_negative_and_rounding() {
        assert_eq!(format_amount(-1234.567), "-1,234.57");
        assert_eq!(format_amount(-12.0), "-12.00");
    }

    #[test]
    fn test_prediction_serialization() {
        let mut inputs = BTreeMap::new();
        inputs.insert("budget".to_string(), 1000.0);

        let prediction = Prediction::new("revenue".to_string(), 2000.0, "linear".to_string(), inputs);

        let json = serde_json::to_string(&prediction).unwrap();
        let deserialized: Prediction = serde_json::from_str(&json).unwrap();

        assert_eq!(prediction.prediction_id, deserialized.prediction_id);
        assert_eq!(deserialized.value, 2000.0);
        assert_eq!(deserialized.formatted, "2,000.00");
        assert_eq!(deserialized.inputs.get("budget"), Some(&1000.0));
    }
}
