use super::{Evaluation, StatusRule};
use crate::models::{ExplanationReason, NutrientStatus, StatusEvaluation};

/// The requirement is essentially met: high coverage, or the optimizer
/// explicitly marked it covered. Whatever remains is supplemental.
pub struct CoveredRule;

impl StatusRule for CoveredRule {
    fn id(&self) -> &'static str {
        "covered"
    }

    fn evaluate(&self, eval: &Evaluation) -> Option<StatusEvaluation> {
        let covered = eval.coverage_or_zero() >= eval.thresholds.covered_pct
            || eval.reason == ExplanationReason::Covered;
        if !covered {
            return None;
        }

        Some(StatusEvaluation::new(
            NutrientStatus::Supplemental,
            format!(
                "{} requirement essentially covered ({:.0}%); remaining dose is supplemental.",
                eval.nutrient,
                eval.coverage_or_zero()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierThresholds;
    use crate::models::{AgronomicContext, Nutrient};

    fn run(coverage: Option<f64>, reason: ExplanationReason) -> Option<StatusEvaluation> {
        let ctx = AgronomicContext::default();
        let thresholds = ClassifierThresholds::default();
        CoveredRule.evaluate(&Evaluation {
            nutrient: Nutrient::P2O5,
            coverage,
            reason,
            deficit: 5.0,
            context: &ctx,
            growth_stage: "Fructificación",
            thresholds: &thresholds,
        })
    }

    #[test]
    fn threshold_coverage_matches() {
        assert!(run(Some(85.0), ExplanationReason::Unspecified).is_some());
        assert!(run(Some(84.9), ExplanationReason::Unspecified).is_none());
    }

    #[test]
    fn covered_marker_matches_regardless_of_number() {
        let result = run(Some(40.0), ExplanationReason::Covered).unwrap();
        assert_eq!(result.status, NutrientStatus::Supplemental);
    }

    #[test]
    fn absent_coverage_reads_as_zero() {
        assert!(run(None, ExplanationReason::Unspecified).is_none());
    }
}
