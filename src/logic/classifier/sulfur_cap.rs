use super::{Evaluation, StatusRule};
use crate::models::{Nutrient, NutrientStatus, StatusEvaluation};

/// Small sulfur deficits at low coverage are capped instead of dosed in
/// full: chasing a few kg/ha of S risks over-acidifying the solution.
pub struct SulfurCapRule;

impl StatusRule for SulfurCapRule {
    fn id(&self) -> &'static str {
        "sulfur_cap"
    }

    fn evaluate(&self, eval: &Evaluation) -> Option<StatusEvaluation> {
        if eval.nutrient != Nutrient::S {
            return None;
        }
        let small_deficit =
            eval.deficit > 0.0 && eval.deficit < eval.thresholds.s_deficit_cap_kg_ha;
        if !small_deficit || eval.coverage_or_zero() >= eval.thresholds.s_floor_pct {
            return None;
        }

        Some(StatusEvaluation::new(
            NutrientStatus::IntentionallyLimited,
            format!(
                "Sulfur deficit ({:.1} kg/ha) is small; capped for safety instead of fully dosed.",
                eval.deficit
            ),
        ))
    }
}
