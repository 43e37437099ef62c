//! RICE prioritization: (Reach × Impact × Confidence) / Effort.
use serde_json::{json, Value};

use super::calls::RiceInput;
use crate::errors::{AgentError, AgentResult};

/// Qualitative band a RICE score falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Lower bounds are inclusive: exactly 100 is very high, exactly 50 is high, ...
    pub fn from_score(score: f64) -> Self {
        if score >= 100.0 {
            Priority::VeryHigh
        } else if score >= 50.0 {
            Priority::High
        } else if score >= 20.0 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            Priority::VeryHigh => {
                "Very High Priority - Strong candidate for immediate development"
            }
            Priority::High => "High Priority - Should be prioritized in upcoming sprint",
            Priority::Medium => "Medium Priority - Good addition to roadmap",
            Priority::Low => "Low Priority - Consider for future or deprioritize",
        }
    }
}

/// Unrounded score. Confidence is a percentage.
pub fn rice_score(reach: f64, impact: f64, confidence: f64, effort: f64) -> AgentResult<f64> {
    for (field, value) in [
        ("reach", reach),
        ("impact", impact),
        ("confidence", confidence),
        ("effort", effort),
    ] {
        if !value.is_finite() {
            return Err(AgentError::InvalidParameters(format!(
                "{} must be a finite number",
                field
            )));
        }
    }
    if effort <= 0.0 {
        return Err(AgentError::InvalidParameters(
            "effort must be greater than zero person-months".to_string(),
        ));
    }

    let score = reach * impact * (confidence / 100.0) / effort;
    if !score.is_finite() {
        return Err(AgentError::ExecutionError(
            "RICE score is too large to represent".to_string(),
        ));
    }
    Ok(score)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Echo a number the way it was most likely written: integers without a fraction
pub(crate) fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

pub fn calculate(input: &RiceInput) -> AgentResult<Value> {
    let score = rice_score(input.reach, input.impact, input.confidence, input.effort)?;
    let rounded = round2(score);
    if !rounded.is_finite() {
        return Err(AgentError::ExecutionError(
            "RICE score is too large to round".to_string(),
        ));
    }

    Ok(json!({
        "feature": input.feature_name,
        "rice_score": rounded,
        "breakdown": {
            "reach": json_number(input.reach),
            "impact": json_number(input.impact),
            "confidence": format!("{}%", input.confidence),
            "effort": format!("{} person-months", input.effort),
        },
        "interpretation": Priority::from_score(score).interpretation(),
    }))
}
