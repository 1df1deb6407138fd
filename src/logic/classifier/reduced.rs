use super::not_required::{build_not_required, nitrogen_soil_covered, potassium_soil_covered};
use super::{Evaluation, StatusRule};
use crate::models::{ExplanationReason, Nutrient, NutrientStatus, StatusEvaluation};

/// The optimizer reduced or avoided the dose. Before settling on a
/// supplemental reading, two soil overrides re-classify to "not required":
/// nitrogen that the soil nitrate already covers during early growth, and
/// potassium on high-K soils (or with no deficit at all).
pub struct ReducedRule;

impl StatusRule for ReducedRule {
    fn id(&self) -> &'static str {
        "reduced"
    }

    fn evaluate(&self, eval: &Evaluation) -> Option<StatusEvaluation> {
        if eval.reason != ExplanationReason::Reduced {
            return None;
        }

        let soil_override = match eval.nutrient {
            Nutrient::N => nitrogen_soil_covered(eval),
            Nutrient::K2O => potassium_soil_covered(eval) || eval.deficit == 0.0,
            _ => false,
        };
        if soil_override {
            return Some(build_not_required(eval));
        }

        Some(StatusEvaluation::new(
            NutrientStatus::Supplemental,
            format!(
                "{} dose reduced; a complementary application covers the remaining need.",
                eval.nutrient
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierThresholds;
    use crate::models::{AgronomicContext, SoilAnalysis};

    fn soil(no3n_ppm: Option<f64>, k_ppm: Option<f64>) -> AgronomicContext {
        AgronomicContext {
            soil: SoilAnalysis {
                no3n_ppm,
                k_ppm,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn nitrogen_override_needs_both_early_stage_and_high_nitrate() {
        let thresholds = ClassifierThresholds::default();
        let high_nitrate = soil(Some(45.0), None);

        let early = Evaluation {
            nutrient: Nutrient::N,
            coverage: Some(30.0),
            reason: ExplanationReason::Reduced,
            deficit: 12.0,
            context: &high_nitrate,
            growth_stage: "Plántula",
            thresholds: &thresholds,
        };
        assert_eq!(
            ReducedRule.evaluate(&early).unwrap().status,
            NutrientStatus::NotRequired
        );

        let late = Evaluation {
            growth_stage: "Fructificación",
            ..early
        };
        assert_eq!(
            ReducedRule.evaluate(&late).unwrap().status,
            NutrientStatus::Supplemental
        );
    }

    #[test]
    fn potassium_override_on_high_k_or_zero_deficit() {
        let thresholds = ClassifierThresholds::default();

        let high_k = soil(None, Some(430.0));
        let by_soil = Evaluation {
            nutrient: Nutrient::K2O,
            coverage: Some(40.0),
            reason: ExplanationReason::Reduced,
            deficit: 15.0,
            context: &high_k,
            growth_stage: "Vegetativo",
            thresholds: &thresholds,
        };
        assert_eq!(
            ReducedRule.evaluate(&by_soil).unwrap().status,
            NutrientStatus::NotRequired
        );

        let low_k = soil(None, Some(120.0));
        let by_deficit = Evaluation {
            deficit: 0.0,
            context: &low_k,
            ..by_soil
        };
        assert_eq!(
            ReducedRule.evaluate(&by_deficit).unwrap().status,
            NutrientStatus::NotRequired
        );
    }

    #[test]
    fn other_nutrients_stay_supplemental() {
        let thresholds = ClassifierThresholds::default();
        let ctx = soil(Some(80.0), Some(500.0));
        let e = Evaluation {
            nutrient: Nutrient::Mg,
            coverage: Some(40.0),
            reason: ExplanationReason::Reduced,
            deficit: 8.0,
            context: &ctx,
            growth_stage: "Plántula",
            thresholds: &thresholds,
        };
        assert_eq!(
            ReducedRule.evaluate(&e).unwrap().status,
            NutrientStatus::Supplemental
        );
    }
}
