use crate::upload::ProcessingStatus;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Backend similarity below this marks a claim high risk.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// One response describes the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: ReportData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub validation: Option<String>,
    #[serde(default, deserialize_with = "lenient_statuses")]
    pub processing_status: Option<HashMap<String, ProcessingStatus>>,
    #[serde(default)]
    pub fraud_risk: Option<FraudRisk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRisk {
    pub text_analysis: TextAnalysis,
    pub document_similarity: f64,
    pub combined_risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub fraud_risk: RiskLevel,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub verification_needed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Kept verbatim so the view can still show what the backend sent
    Unrecognized(String),
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => "low".to_string(),
            RiskLevel::Medium => "medium".to_string(),
            RiskLevel::High => "high".to_string(),
            RiskLevel::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("LOW"),
            Self::Medium => f.write_str("MEDIUM"),
            Self::High => f.write_str("HIGH"),
            Self::Unrecognized(raw) => write!(f, "{}", raw.to_uppercase()),
        }
    }
}

impl RiskLevel {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl FraudRisk {
    pub fn similarity(&self) -> f64 {
        if self.document_similarity.is_finite() {
            self.document_similarity.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn similarity_percent(&self) -> String {
        format!("{:.1}%", self.similarity() * 100.0)
    }

    /// Risk level to display, plus whether it had to be derived locally.
    ///
    /// An unrecognized `combined_risk` is recomputed with the backend's own
    /// rule: high when similarity is under the threshold or the text analysis
    /// says high, medium when the text analysis says medium, otherwise low.
    pub fn effective_risk(&self) -> (RiskLevel, bool) {
        if self.combined_risk.is_recognized() {
            return (self.combined_risk.clone(), false);
        }
        let derived = if self.similarity() < SIMILARITY_THRESHOLD
            || self.text_analysis.fraud_risk == RiskLevel::High
        {
            RiskLevel::High
        } else if self.text_analysis.fraud_risk == RiskLevel::Medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        (derived, true)
    }
}

fn lenient_statuses<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, ProcessingStatus>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, String>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|raw| {
        raw.into_iter()
            .filter_map(|(id, value)| match ProcessingStatus::parse(&value) {
                Some(status) => Some((id, status)),
                None => {
                    warn!(%id, %value, "Ignoring unknown processing status");
                    None
                }
            })
            .collect()
    }))
}
