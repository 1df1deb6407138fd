use crate::config::OptimizerConfig;
use crate::error::{FertigateError, Result};
use crate::models::{
    AgronomicContext, ExplanationReason, Micronutrient, Nutrient, StageDelta,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Client for the external fertigation calculation service. The service
/// owns all blend optimization; this client sends stage requirements and
/// context, and normalizes what comes back (string nutrient keys to enums,
/// free-text explanations to [`ExplanationReason`]).
pub struct OptimizerClient {
    client: reqwest::Client,
    config: OptimizerConfig,
}

#[derive(Debug, Serialize)]
struct CalculateRequest<'a> {
    crop: &'a str,
    growth_stage: &'a str,
    requirements: HashMap<&'static str, f64>,
    micro_requirements: HashMap<&'static str, f64>,
    agronomic_context: &'a AgronomicContext,
}

// Service response structures
#[derive(Debug, Deserialize)]
struct CalculateResponse {
    #[serde(default)]
    coverage: HashMap<String, f64>,
    #[serde(default)]
    coverage_explained: HashMap<String, String>,
    #[serde(default)]
    real_deficit: HashMap<String, f64>,
    #[serde(default)]
    fertilizers: Vec<FertilizerDose>,
    #[serde(default)]
    acid_treatment: Option<AcidTreatment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FertilizerDose {
    pub name: String,
    pub kg_ha: f64,
    #[serde(default)]
    pub supplies: Option<String>,
}

/// Acid recommendation passthrough; the dosing math stays server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcidTreatment {
    #[serde(default)]
    pub acid_type: Option<String>,
    #[serde(default, alias = "n_g_per_1000L")]
    pub n_g_per_1000l: f64,
    #[serde(default, alias = "p_g_per_1000L")]
    pub p_g_per_1000l: f64,
    #[serde(default, alias = "s_g_per_1000L")]
    pub s_g_per_1000l: f64,
}

/// Normalized service output the classifier and renderer consume.
#[derive(Debug, Clone)]
pub struct OptimizerOutcome {
    pub coverage: HashMap<Nutrient, f64>,
    pub reasons: HashMap<Nutrient, ExplanationReason>,
    pub deficits: HashMap<Nutrient, f64>,
    pub program: Vec<FertilizerDose>,
    pub acid_treatment: Option<AcidTreatment>,
    pub generated_at: DateTime<Utc>,
}

impl OptimizerClient {
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Submit the stage requirements and return the normalized program.
    pub async fn calculate(
        &self,
        crop: &str,
        growth_stage: &str,
        delta: &StageDelta,
        micros: &HashMap<Micronutrient, f64>,
        context: &AgronomicContext,
    ) -> Result<OptimizerOutcome> {
        let request = CalculateRequest {
            crop,
            growth_stage,
            requirements: Nutrient::ALL
                .iter()
                .map(|&n| (n.as_str(), delta.delta_amount(n)))
                .collect(),
            micro_requirements: micros.iter().map(|(m, v)| (m.as_str(), *v)).collect(),
            agronomic_context: context,
        };

        let url = format!("{}/calculate", self.config.url);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            FertigateError::ServiceUnavailable(format!("optimizer: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FertigateError::ServiceUnavailable(format!(
                "optimizer returned {}: {}",
                status, body
            )));
        }

        let raw: CalculateResponse = response.json().await.map_err(|e| {
            FertigateError::ServiceUnavailable(format!(
                "Failed to parse optimizer response: {}",
                e
            ))
        })?;

        Ok(Self::normalize(raw))
    }

    /// Connectivity probe for `fertigate check`.
    pub async fn ping(&self) -> bool {
        let url = format!("{}/health", self.config.url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("optimizer ping failed: {}", e);
                false
            }
        }
    }

    fn normalize(raw: CalculateResponse) -> OptimizerOutcome {
        let keyed = |map: HashMap<String, f64>| -> HashMap<Nutrient, f64> {
            map.into_iter()
                .filter_map(|(k, v)| Nutrient::from_str(&k).map(|n| (n, v)))
                .collect()
        };

        let reasons = raw
            .coverage_explained
            .into_iter()
            .filter_map(|(key, text)| {
                Nutrient::from_str(&key).map(|n| (n, ExplanationReason::from_marker(&text)))
            })
            .collect();

        OptimizerOutcome {
            coverage: keyed(raw.coverage),
            reasons,
            deficits: keyed(raw.real_deficit),
            program: raw.fertilizers,
            acid_treatment: raw.acid_treatment,
            generated_at: Utc::now(),
        }
    }
}

impl OptimizerOutcome {
    pub fn coverage_for(&self, nutrient: Nutrient) -> Option<f64> {
        self.coverage.get(&nutrient).copied()
    }

    pub fn reason_for(&self, nutrient: Nutrient) -> ExplanationReason {
        self.reasons
            .get(&nutrient)
            .copied()
            .unwrap_or(ExplanationReason::Unspecified)
    }

    pub fn deficit_for(&self, nutrient: Nutrient) -> f64 {
        self.deficits.get(&nutrient).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_normalizes_keys_and_reasons() {
        let raw: CalculateResponse = serde_json::from_str(
            r#"{
                "coverage": {"N": 92.0, "K2O": 50.0, "Na": 10.0},
                "coverage_explained": {"N": "cubierto", "K2O": "parcial (50%)"},
                "real_deficit": {"K2O": 20.0},
                "fertilizers": [{"name": "Potassium nitrate", "kg_ha": 120.0, "supplies": "K2O"}],
                "acid_treatment": {"acid_type": "nitric_acid", "n_g_per_1000L": 35.0}
            }"#,
        )
        .unwrap();

        let outcome = OptimizerClient::normalize(raw);
        assert_eq!(outcome.coverage_for(Nutrient::N), Some(92.0));
        // Unknown nutrient keys are dropped, not errors.
        assert_eq!(outcome.coverage.len(), 2);
        assert_eq!(outcome.reason_for(Nutrient::N), ExplanationReason::Covered);
        assert_eq!(
            outcome.reason_for(Nutrient::K2O),
            ExplanationReason::Unspecified
        );
        // Every recognized explanation key parses to a reason entry.
        assert_eq!(outcome.reasons.len(), 2);
        assert_eq!(outcome.deficit_for(Nutrient::K2O), 20.0);
        assert_eq!(outcome.deficit_for(Nutrient::N), 0.0);
        assert_eq!(outcome.program.len(), 1);
        assert_eq!(
            outcome.acid_treatment.unwrap().n_g_per_1000l,
            35.0
        );
    }

    #[test]
    fn missing_response_sections_default_empty() {
        let raw: CalculateResponse = serde_json::from_str("{}").unwrap();
        let outcome = OptimizerClient::normalize(raw);
        assert!(outcome.coverage.is_empty());
        assert!(outcome.program.is_empty());
        assert_eq!(
            outcome.reason_for(Nutrient::S),
            ExplanationReason::Unspecified
        );
    }
}
