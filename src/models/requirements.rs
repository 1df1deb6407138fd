use super::{Micronutrient, Nutrient};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whole-cycle nutrient requirements for a crop: macros in kg/ha, micros
/// in g/ha. Derived upstream from yield targets; opaque here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutrientTotals {
    #[serde(default)]
    pub macros: HashMap<Nutrient, f64>,
    #[serde(default)]
    pub micros: HashMap<Micronutrient, f64>,
}

impl NutrientTotals {
    pub fn macro_total(&self, nutrient: Nutrient) -> f64 {
        self.macros.get(&nutrient).copied().unwrap_or(0.0)
    }

    pub fn micro_total(&self, micro: Micronutrient) -> f64 {
        self.micros.get(&micro).copied().unwrap_or(0.0)
    }
}

/// Incremental requirement attributable to a single stage of a nutrient's
/// extraction curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientDelta {
    pub current_percent: f64,
    pub previous_percent: f64,
    pub delta_percent: f64,
    /// kg/ha for macros.
    pub delta_amount: f64,
}

/// Stage-relative requirements derived from an extraction curve.
///
/// Recomputed on every stage or curve change, never persisted. Negative
/// `delta_percent` is possible when the source curve is non-monotonic;
/// the resolver computes the arithmetic as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDelta {
    pub macros: HashMap<Nutrient, NutrientDelta>,
    /// Arithmetic mean of `delta_percent` over the six macros. Scales
    /// micronutrient requirements and soil/water contributions, which have
    /// no curve of their own.
    pub average_delta_percent: f64,
}

impl StageDelta {
    /// Fallback when the crop has no extraction curve: the entire
    /// requirement is due this cycle.
    pub fn full_cycle(totals: &NutrientTotals) -> Self {
        let macros = Nutrient::ALL
            .iter()
            .map(|&n| {
                (
                    n,
                    NutrientDelta {
                        current_percent: 100.0,
                        previous_percent: 0.0,
                        delta_percent: 100.0,
                        delta_amount: totals.macro_total(n),
                    },
                )
            })
            .collect();

        Self {
            macros,
            average_delta_percent: 100.0,
        }
    }

    pub fn delta_amount(&self, nutrient: Nutrient) -> f64 {
        self.macros.get(&nutrient).map(|d| d.delta_amount).unwrap_or(0.0)
    }

    pub fn delta_percent(&self, nutrient: Nutrient) -> f64 {
        self.macros.get(&nutrient).map(|d| d.delta_percent).unwrap_or(0.0)
    }

    /// Micronutrient requirement for the stage, in g/ha, scaled by the mean
    /// macro delta.
    pub fn scaled_micros(&self, totals: &NutrientTotals) -> HashMap<Micronutrient, f64> {
        Micronutrient::ALL
            .iter()
            .map(|&m| (m, totals.micro_total(m) * self.average_delta_percent / 100.0))
            .collect()
    }
}
