use crate::error::{FertigateError, Result};
use crate::models::{ExtractionCurve, Nutrient, NutrientDelta, NutrientTotals, StageDelta};
use std::collections::HashMap;

/// Resolve the incremental nutrient requirement attributable to one stage
/// of an extraction curve.
///
/// Returns `Ok(None)` when no stage is selected (`None` or an empty id);
/// that is a valid state, and the caller falls back to
/// [`StageDelta::full_cycle`] or blocks until a stage is picked.
/// A non-empty id that matches no stage is
/// a [`FertigateError::StageNotFound`] sentinel so the caller can fall back
/// instead of crashing.
///
/// Pure and deterministic: no rounding, no clamping. A nutrient missing
/// from a stage's map reads as 100% cumulative (and 0% for the previous
/// stage), so untracked nutrients fall due in full at their first
/// appearance, matching the catalog convention.
pub fn resolve_stage_delta(
    curve: &ExtractionCurve,
    stage_id: Option<&str>,
    totals: &NutrientTotals,
) -> Result<Option<StageDelta>> {
    let stage_id = match stage_id {
        None => return Ok(None),
        Some(id) if id.is_empty() => return Ok(None),
        Some(id) => id,
    };

    let index = curve
        .stage_index(stage_id)
        .ok_or_else(|| FertigateError::StageNotFound {
            stage_id: stage_id.to_string(),
            curve: curve.id.clone(),
        })?;

    let current = &curve.stages[index];
    let previous = if index == 0 {
        None
    } else {
        Some(&curve.stages[index - 1])
    };

    let mut macros = HashMap::new();
    let mut delta_sum = 0.0;
    for nutrient in Nutrient::ALL {
        let current_percent = current.cumulative(nutrient).unwrap_or(100.0);
        let previous_percent = previous
            .and_then(|s| s.cumulative(nutrient))
            .unwrap_or(0.0);
        let delta_percent = current_percent - previous_percent;
        delta_sum += delta_percent;

        macros.insert(
            nutrient,
            NutrientDelta {
                current_percent,
                previous_percent,
                delta_percent,
                delta_amount: totals.macro_total(nutrient) * delta_percent / 100.0,
            },
        );
    }

    Ok(Some(StageDelta {
        macros,
        average_delta_percent: delta_sum / Nutrient::ALL.len() as f64,
    }))
}
