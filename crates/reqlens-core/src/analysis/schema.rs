//! Structured analysis schema and its validation

use super::extract::extract_json_object;
use crate::error::{ReqlensError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Three-level rating used for priority, probability and impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub const ALLOWED: [&'static str; 3] = ["high", "medium", "low"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated analysis of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub project_overview: ProjectOverview,
    pub functional_requirements: Vec<FunctionalRequirement>,
    pub non_functional_requirements: Vec<NonFunctionalRequirement>,
    pub keywords: Vec<String>,
    pub risk_factors: Vec<RiskFactor>,
    #[serde(deserialize_with = "lenient_f64")]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    pub title: String,
    pub description: String,
    pub scope: String,
    pub objectives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalRequirement {
    pub title: String,
    pub description: String,
    pub priority: Level,
    pub category: String,
    pub acceptance_criteria: Vec<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub estimated_effort: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonFunctionalRequirement {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Level,
    pub metric: String,
    pub target_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub title: String,
    pub description: String,
    pub probability: Level,
    pub impact: Level,
    pub mitigation: String,
}

/// Accept `0.8` as well as `"0.8"`; models are inconsistent about quoting numbers
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("expected a number, got \"{s}\""))
        }),
    }
}

impl AnalysisResult {
    /// Parse and validate a raw model reply. All-or-nothing: any violation
    /// rejects the whole result and carries the raw content.
    pub fn from_model_output(content: &str) -> Result<Self> {
        let value = extract_json_object(content)
            .ok_or_else(|| ReqlensError::schema("no JSON object found in model output", content))?;

        let result: AnalysisResult = serde_json::from_value(value)
            .map_err(|e| ReqlensError::schema(format!("schema mismatch: {e}"), content))?;

        result
            .check_ranges()
            .map_err(|message| ReqlensError::schema(message, content))?;

        Ok(result)
    }

    fn check_ranges(&self) -> std::result::Result<(), String> {
        if !self.confidence_score.is_finite() || !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(format!(
                "confidenceScore must be within [0, 1], got {}",
                self.confidence_score
            ));
        }

        for (i, req) in self.functional_requirements.iter().enumerate() {
            if !req.estimated_effort.is_finite() || req.estimated_effort < 0.0 {
                return Err(format!(
                    "functionalRequirements[{i}].estimatedEffort must be a non-negative number, got {}",
                    req.estimated_effort
                ));
            }
        }

        Ok(())
    }
}
