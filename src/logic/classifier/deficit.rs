use super::{Evaluation, StatusRule};
use crate::models::{NutrientStatus, StatusEvaluation};

/// Terminal rule: nothing earlier in the cascade explained the shortfall,
/// so it is a genuine deficit the fertigation program must address.
/// Always answers, which makes the cascade total.
pub struct DeficitRule;

impl StatusRule for DeficitRule {
    fn id(&self) -> &'static str {
        "deficit_real"
    }

    fn evaluate(&self, eval: &Evaluation) -> Option<StatusEvaluation> {
        Some(real_deficit(eval))
    }
}

pub(super) fn real_deficit(eval: &Evaluation) -> StatusEvaluation {
    StatusEvaluation::new(
        NutrientStatus::DeficitReal,
        format!(
            "Real {} deficit: only {:.0}% of the stage requirement is covered.",
            eval.nutrient,
            eval.coverage_or_zero()
        ),
    )
}
