use serde::{Deserialize, Serialize};

/// Semantic coverage status of one nutrient for one evaluation. Flat,
/// stateless: every classification is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientStatus {
    NotRequired,
    IntentionallyLimited,
    Supplemental,
    DeficitReal,
}

impl NutrientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientStatus::NotRequired => "NotRequired",
            NutrientStatus::IntentionallyLimited => "IntentionallyLimited",
            NutrientStatus::Supplemental => "Supplemental",
            NutrientStatus::DeficitReal => "DeficitReal",
        }
    }

    /// Short label for rendering collaborators.
    pub fn label(&self) -> &'static str {
        match self {
            NutrientStatus::NotRequired => "Not required",
            NutrientStatus::IntentionallyLimited => "Limited",
            NutrientStatus::Supplemental => "Supplemental",
            NutrientStatus::DeficitReal => "Deficit",
        }
    }

    /// Display color for rendering collaborators.
    pub fn color(&self) -> &'static str {
        match self {
            NutrientStatus::NotRequired => "#6c757d",
            NutrientStatus::IntentionallyLimited => "#f0ad4e",
            NutrientStatus::Supplemental => "#5bc0de",
            NutrientStatus::DeficitReal => "#d9534f",
        }
    }
}

impl std::fmt::Display for NutrientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifier output: a status plus the rationale shown next to the raw
/// coverage number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvaluation {
    pub status: NutrientStatus,
    pub message: String,
}

impl StatusEvaluation {
    pub fn new(status: NutrientStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Why the optimizer settled on a coverage figure for a nutrient.
///
/// The service reports this as free text (`coverage_explained`), in either
/// of two languages depending on deployment. [`ExplanationReason::from_marker`]
/// parses the text once at the service boundary so the classification rules
/// match on a closed variant set instead of repeating substring checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplanationReason {
    NotRequired,
    Capped,
    Reduced,
    Covered,
    Unspecified,
}

impl ExplanationReason {
    /// Case-insensitive marker detection over the raw explanation text.
    /// Both language variants of every marker are accepted.
    pub fn from_marker(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("no_required")
            || text.contains("not_required")
            || text.contains("no_requerido")
        {
            ExplanationReason::NotRequired
        } else if text.contains("limitado") || text.contains("capped") || text.contains("limited")
        {
            ExplanationReason::Capped
        } else if text.contains("reducido")
            || text.contains("reduced")
            || text.contains("evitado")
            || text.contains("avoided")
        {
            ExplanationReason::Reduced
        } else if text.contains("cubierto") || text.contains("covered") {
            ExplanationReason::Covered
        } else {
            ExplanationReason::Unspecified
        }
    }
}
