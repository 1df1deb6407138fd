use super::Nutrient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cumulative nutrient extraction curve for one crop.
///
/// Stages are stored in phenological order. `cumulative_percent` for a
/// well-formed curve is non-decreasing per nutrient and ends at 100, but
/// that is an authoring-time contract checked by [`ExtractionCurve::validate`],
/// not enforced during resolution. Catalog and user-authored curves share
/// this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionCurve {
    pub id: String,
    pub name: String,
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration_days: Option<DurationDays>,
    /// Percent of the whole-cycle requirement absorbed by the end of this
    /// stage, per nutrient.
    pub cumulative_percent: HashMap<Nutrient, f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurationDays {
    pub min: u32,
    pub max: u32,
}

impl Stage {
    pub fn cumulative(&self, nutrient: Nutrient) -> Option<f64> {
        self.cumulative_percent.get(&nutrient).copied()
    }
}

impl ExtractionCurve {
    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    pub fn stage_index(&self, stage_id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.id == stage_id)
    }

    /// Authoring-time sanity check. Returns one warning per violation of
    /// the curve contract: cumulative percents must be non-decreasing per
    /// nutrient and the last stage must reach 100 for every tracked
    /// nutrient. Resolution does not call this; a malformed curve still
    /// resolves (and may yield negative deltas).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.stages.is_empty() {
            warnings.push(format!("curve '{}' has no stages", self.id));
            return warnings;
        }

        for nutrient in Nutrient::ALL {
            let mut previous = 0.0_f64;
            for stage in &self.stages {
                let Some(current) = stage.cumulative(nutrient) else {
                    continue;
                };
                if current < previous {
                    warnings.push(format!(
                        "curve '{}': {} drops from {:.1}% to {:.1}% at stage '{}'",
                        self.id, nutrient, previous, current, stage.id
                    ));
                }
                previous = current;
            }

            let last = self.stages.last().and_then(|s| s.cumulative(nutrient));
            if let Some(last) = last {
                if (last - 100.0).abs() > 1e-6 {
                    warnings.push(format!(
                        "curve '{}': {} ends at {:.1}% instead of 100%",
                        self.id, nutrient, last
                    ));
                }
            }
        }

        warnings
    }
}
