use super::{Evaluation, StatusRule};
use crate::models::{ExplanationReason, Nutrient, NutrientStatus, StatusEvaluation};

/// The optimizer deliberately capped the dose below the computed deficit.
pub struct CappedRule;

impl StatusRule for CappedRule {
    fn id(&self) -> &'static str {
        "capped"
    }

    fn evaluate(&self, eval: &Evaluation) -> Option<StatusEvaluation> {
        if eval.reason != ExplanationReason::Capped {
            return None;
        }

        let message = if eval.nutrient == Nutrient::S {
            "Sulfur dose capped for safety; small deficits are deliberately not chased."
                .to_string()
        } else {
            format!(
                "{} dose deliberately capped below the computed deficit to avoid over-fertilization.",
                eval.nutrient
            )
        };

        Some(StatusEvaluation::new(
            NutrientStatus::IntentionallyLimited,
            message,
        ))
    }
}
