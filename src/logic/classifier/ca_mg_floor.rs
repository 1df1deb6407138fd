use super::{Evaluation, StatusRule};
use crate::models::{Nutrient, NutrientStatus, StatusEvaluation};

/// Calcium and magnesium ride mostly on soil reserves. With no deficit or
/// very low coverage, the program keeps only a minimal physiological
/// top-up rather than chasing the gap.
pub struct CaMgFloorRule;

impl StatusRule for CaMgFloorRule {
    fn id(&self) -> &'static str {
        "ca_mg_floor"
    }

    fn evaluate(&self, eval: &Evaluation) -> Option<StatusEvaluation> {
        if !matches!(eval.nutrient, Nutrient::Ca | Nutrient::Mg) {
            return None;
        }
        if eval.deficit != 0.0 && eval.coverage_or_zero() >= eval.thresholds.ca_mg_floor_pct {
            return None;
        }

        Some(StatusEvaluation::new(
            NutrientStatus::Supplemental,
            format!(
                "Soil reserves cover {}; only a minimal physiological top-up is kept.",
                eval.nutrient
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierThresholds;
    use crate::models::{AgronomicContext, ExplanationReason};

    fn run(nutrient: Nutrient, coverage: Option<f64>, deficit: f64) -> Option<StatusEvaluation> {
        let ctx = AgronomicContext::default();
        let thresholds = ClassifierThresholds::default();
        CaMgFloorRule.evaluate(&Evaluation {
            nutrient,
            coverage,
            reason: ExplanationReason::Unspecified,
            deficit,
            context: &ctx,
            growth_stage: "Vegetativo",
            thresholds: &thresholds,
        })
    }

    #[test]
    fn low_coverage_calcium_is_supplemental() {
        let result = run(Nutrient::Ca, Some(20.0), 15.0).unwrap();
        assert_eq!(result.status, NutrientStatus::Supplemental);

        // Absent coverage reads as 0, below the floor.
        let result = run(Nutrient::Mg, None, 8.0).unwrap();
        assert_eq!(result.status, NutrientStatus::Supplemental);
    }

    #[test]
    fn zero_deficit_magnesium_is_supplemental() {
        let result = run(Nutrient::Mg, Some(60.0), 0.0).unwrap();
        assert_eq!(result.status, NutrientStatus::Supplemental);
    }

    #[test]
    fn adequate_coverage_with_deficit_passes_through() {
        assert!(run(Nutrient::Ca, Some(45.0), 15.0).is_none());
    }

    #[test]
    fn other_nutrients_pass_through() {
        assert!(run(Nutrient::N, Some(10.0), 0.0).is_none());
    }
}
