pub mod ca_mg_floor;
pub mod capped;
pub mod covered;
pub mod deficit;
pub mod not_required;
pub mod reduced;
pub mod sulfur_cap;

use crate::config::ClassifierThresholds;
use crate::models::{AgronomicContext, ExplanationReason, Nutrient, StatusEvaluation};

/// One evaluation of one nutrient. Built per nutrient per render; the
/// classifier holds no state between evaluations.
pub struct Evaluation<'a> {
    pub nutrient: Nutrient,
    /// Coverage percent from the optimizer. Absent reads as 0 wherever a
    /// threshold is compared.
    pub coverage: Option<f64>,
    /// Parsed from the optimizer's `coverage_explained` text at the
    /// service boundary.
    pub reason: ExplanationReason,
    /// Absolute deficit in kg/ha for this nutrient.
    pub deficit: f64,
    pub context: &'a AgronomicContext,
    /// Free-text stage name, matched case-insensitively.
    pub growth_stage: &'a str,
    pub thresholds: &'a ClassifierThresholds,
}

impl Evaluation<'_> {
    pub fn coverage_or_zero(&self) -> f64 {
        self.coverage.unwrap_or(0.0)
    }

    /// Seedling/transplant detection over the free-text stage name. The
    /// catalog and the service both emit stage names, in either language.
    pub fn is_early_stage(&self) -> bool {
        let stage = self.growth_stage.to_lowercase();
        stage.contains("seedling") || stage.contains("plántula") || stage.contains("trasplante")
    }
}

/// One step of the classification cascade.
pub trait StatusRule: Send + Sync {
    fn id(&self) -> &'static str;

    /// Returns a terminal evaluation if this rule decides, `None` to pass
    /// to the next rule.
    fn evaluate(&self, eval: &Evaluation) -> Option<StatusEvaluation>;
}

/// Ordered first-match-wins cascade over [`StatusRule`]s.
///
/// Rule order is load-bearing: each rule may assume every earlier rule
/// declined. The final rule always answers, so classification is total.
pub struct StatusClassifier {
    rules: Vec<Box<dyn StatusRule>>,
}

impl StatusClassifier {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn StatusRule>> = vec![
            Box::new(not_required::NotRequiredRule),
            Box::new(capped::CappedRule),
            Box::new(reduced::ReducedRule),
            Box::new(ca_mg_floor::CaMgFloorRule),
            Box::new(sulfur_cap::SulfurCapRule),
            Box::new(covered::CoveredRule),
            Box::new(deficit::DeficitRule),
        ];

        Self { rules }
    }

    pub fn classify(&self, eval: &Evaluation) -> StatusEvaluation {
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(eval))
            .unwrap_or_else(|| deficit::real_deficit(eval))
    }

    pub fn list_rules(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NutrientStatus, SoilAnalysis};

    fn ctx_with_soil(no3n_ppm: Option<f64>, k_ppm: Option<f64>) -> AgronomicContext {
        AgronomicContext {
            soil: SoilAnalysis {
                no3n_ppm,
                k_ppm,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn classify(
        nutrient: Nutrient,
        coverage: Option<f64>,
        explained: &str,
        deficit: f64,
        context: &AgronomicContext,
        growth_stage: &str,
    ) -> StatusEvaluation {
        let thresholds = ClassifierThresholds::default();
        StatusClassifier::new().classify(&Evaluation {
            nutrient,
            coverage,
            reason: ExplanationReason::from_marker(explained),
            deficit,
            context,
            growth_stage,
            thresholds: &thresholds,
        })
    }

    #[test]
    fn zero_deficit_is_not_required_regardless_of_coverage() {
        let ctx = AgronomicContext::default();
        for coverage in [None, Some(0.0), Some(50.0), Some(110.0)] {
            let result = classify(Nutrient::P2O5, coverage, "", 0.0, &ctx, "Vegetativo");
            assert_eq!(result.status, NutrientStatus::NotRequired);
        }
    }

    #[test]
    fn soil_override_reclassifies_reduced_nitrogen() {
        let ctx = ctx_with_soil(Some(45.0), None);
        let result = classify(
            Nutrient::N,
            Some(30.0),
            "reducido (NO3-N suelo 45 ppm)",
            12.0,
            &ctx,
            "Plántula",
        );
        assert_eq!(result.status, NutrientStatus::NotRequired);
        assert!(result.message.contains("45"));
    }

    #[test]
    fn reduced_without_soil_override_is_supplemental() {
        let ctx = ctx_with_soil(Some(10.0), None);
        let result = classify(Nutrient::N, Some(30.0), "reducido", 12.0, &ctx, "Floración");
        assert_eq!(result.status, NutrientStatus::Supplemental);
    }

    #[test]
    fn sulfur_safety_cap() {
        let ctx = AgronomicContext::default();
        let result = classify(Nutrient::S, Some(40.0), "", 3.0, &ctx, "Floración");
        assert_eq!(result.status, NutrientStatus::IntentionallyLimited);
    }

    #[test]
    fn high_coverage_is_supplemental_not_deficit() {
        let ctx = AgronomicContext::default();
        let result = classify(Nutrient::Ca, Some(90.0), "", 10.0, &ctx, "Fructificación");
        assert_eq!(result.status, NutrientStatus::Supplemental);
    }

    #[test]
    fn plain_deficit_reports_rounded_coverage() {
        let ctx = ctx_with_soil(None, Some(100.0));
        let result = classify(Nutrient::K2O, Some(50.0), "", 20.0, &ctx, "Vegetativo");
        assert_eq!(result.status, NutrientStatus::DeficitReal);
        assert!(result.message.contains("50"));
    }

    #[test]
    fn missing_coverage_reads_as_zero_in_the_deficit_message() {
        let ctx = AgronomicContext::default();
        let result = classify(Nutrient::N, None, "", 40.0, &ctx, "Vegetativo");
        assert_eq!(result.status, NutrientStatus::DeficitReal);
        assert!(result.message.contains('0'));
    }

    #[test]
    fn classification_is_total_over_a_broad_input_grid() {
        let contexts = [
            AgronomicContext::default(),
            ctx_with_soil(Some(60.0), Some(450.0)),
        ];
        let explanations = ["", "no_required", "limitado", "reducido", "cubierto", "???"];
        let stages = ["Plántula", "Vegetativo", "Floración", ""];

        for nutrient in Nutrient::ALL {
            for ctx in &contexts {
                for explained in explanations {
                    for stage in stages {
                        for coverage in [None, Some(0.0), Some(40.0), Some(90.0)] {
                            for deficit in [0.0, 3.0, 25.0] {
                                let result =
                                    classify(nutrient, coverage, explained, deficit, ctx, stage);
                                assert!(!result.message.is_empty());
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn cascade_order_is_stable() {
        assert_eq!(
            StatusClassifier::new().list_rules(),
            vec![
                "not_required",
                "capped",
                "reduced",
                "ca_mg_floor",
                "sulfur_cap",
                "covered",
                "deficit_real",
            ]
        );
    }
}
