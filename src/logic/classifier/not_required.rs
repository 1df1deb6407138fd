use super::{Evaluation, StatusRule};
use crate::models::{ExplanationReason, Nutrient, NutrientStatus, StatusEvaluation};

/// Nothing to supply: the optimizer flagged the nutrient as not required,
/// or the computed deficit is exactly zero.
///
/// The message specializes when the soil itself is the reason: nitrogen
/// during early growth with high nitrate, or high native potassium.
pub struct NotRequiredRule;

impl StatusRule for NotRequiredRule {
    fn id(&self) -> &'static str {
        "not_required"
    }

    fn evaluate(&self, eval: &Evaluation) -> Option<StatusEvaluation> {
        if eval.reason != ExplanationReason::NotRequired && eval.deficit != 0.0 {
            return None;
        }
        Some(build_not_required(eval))
    }
}

pub(super) fn build_not_required(eval: &Evaluation) -> StatusEvaluation {
    let message = match eval.nutrient {
        Nutrient::N if nitrogen_soil_covered(eval) => format!(
            "Soil nitrate ({:.0} ppm NO3-N) already covers nitrogen during early growth.",
            eval.context.soil_no3n_ppm()
        ),
        Nutrient::K2O if potassium_soil_covered(eval) => format!(
            "Native soil potassium is high ({:.0} ppm); no additional K2O needed.",
            eval.context.soil_k_ppm()
        ),
        nutrient => format!("No additional {nutrient} needed in this stage."),
    };

    StatusEvaluation::new(NutrientStatus::NotRequired, message)
}

pub(super) fn nitrogen_soil_covered(eval: &Evaluation) -> bool {
    eval.is_early_stage() && eval.context.soil_no3n_ppm() >= eval.thresholds.no3n_sufficient_ppm
}

pub(super) fn potassium_soil_covered(eval: &Evaluation) -> bool {
    eval.context.soil_k_ppm() >= eval.thresholds.k_sufficient_ppm
}
