use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClassificationResult {
    #[serde(alias = "disease")]
    pub label: String,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            description: None,
            treatment: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_treatment(mut self, treatment: impl Into<String>) -> Self {
        self.treatment = Some(treatment.into());
        self
    }

    /// Confidence as a whole percentage, rounded to nearest.
    pub fn percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }

    pub fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence > HIGH_CONFIDENCE_BADGE
    }
}

/// Threshold above which a primary detection gets the high-confidence badge.
const HIGH_CONFIDENCE_BADGE: f32 = 0.7;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.8 {
            ConfidenceLevel::High
        } else if confidence >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// A validated result set split into the primary detection and the rest,
/// already in display order.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RankedResults {
    pub primary: ClassificationResult,
    pub secondary: Vec<ClassificationResult>,
}

impl RankedResults {
    pub fn len(&self) -> usize {
        1 + self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }
}

/// Wire shapes the classification service may answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ClassifyResponse {
    List(Vec<ClassificationResult>),
    Wrapped {
        #[serde(alias = "predictions")]
        results: Vec<ClassificationResult>,
    },
}

impl ClassifyResponse {
    pub(crate) fn into_results(self) -> Vec<ClassificationResult> {
        match self {
            ClassifyResponse::List(results) => results,
            ClassifyResponse::Wrapped { results } => results,
        }
    }
}
