use crate::catalog::{CropEntry, CurveCatalog};
use crate::config::Config;
use crate::datasources::OptimizerClient;
use crate::error::{FertigateError, Result};
use crate::logic::classifier::Evaluation;
use crate::logic::{resolve_stage_delta, StatusClassifier};
use crate::models::{AgronomicContext, ExtractionCurve, Micronutrient, Nutrient, StageDelta};
use std::path::Path;

fn load_catalog(config: &Config) -> Result<CurveCatalog> {
    CurveCatalog::load(
        &config.catalog.path,
        config.catalog.custom_path.as_deref(),
    )
}

/// Resolve the active stage delta for a crop, applying the fallback policy:
/// a crop without a curve owes its whole-cycle totals; a crop with a curve
/// blocks until a stage is selected; an unmatched stage id becomes a
/// not-found error carrying the valid stage ids.
fn stage_delta_for(entry: &CropEntry, stage: Option<&str>) -> Result<StageDelta> {
    let Some(curve) = &entry.curve else {
        if stage.is_some_and(|s| !s.is_empty()) {
            tracing::warn!(
                "crop '{}' has no extraction curve; stage selection ignored",
                entry.id
            );
        }
        return Ok(StageDelta::full_cycle(&entry.total_requirements));
    };

    match resolve_stage_delta(curve, stage, &entry.total_requirements) {
        Ok(Some(delta)) => Ok(delta),
        Ok(None) => Err(FertigateError::InvalidData(format!(
            "crop '{}' has an extraction curve; select a stage with --stage ({})",
            entry.id,
            stage_ids(curve)
        ))),
        Err(FertigateError::StageNotFound { stage_id, .. }) => {
            Err(FertigateError::NotFound(format!(
                "stage '{}' in crop '{}'; available: {}",
                stage_id,
                entry.id,
                stage_ids(curve)
            )))
        }
        Err(e) => Err(e),
    }
}

fn stage_ids(curve: &ExtractionCurve) -> String {
    curve
        .stages
        .iter()
        .map(|s| s.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn load_context(soil: Option<&Path>, water: Option<&Path>) -> Result<AgronomicContext> {
    let mut context = AgronomicContext::default();
    if let Some(path) = soil {
        context.soil = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    }
    if let Some(path) = water {
        context.water = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    }
    Ok(context)
}

pub async fn check(config: &Config) -> Result<()> {
    println!("Config: OK");

    match load_catalog(config) {
        Ok(catalog) => {
            let warnings = catalog.validate_all();
            println!("Catalog: OK ({} crops)", catalog.available_crops().len());
            for warning in &warnings {
                println!("  warning: {}", warning);
            }
            if !warnings.is_empty() {
                println!("Catalog: {} warning(s)", warnings.len());
            }
        }
        Err(e) => println!("Catalog: FAILED ({})", e),
    }

    if config.optimizer.enabled {
        let client = OptimizerClient::new(config.optimizer.clone())?;
        if client.ping().await {
            println!("Optimizer: OK");
        } else {
            println!("Optimizer: OFFLINE");
        }
    } else {
        println!("Optimizer: disabled");
    }

    Ok(())
}

pub fn crops(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    println!("{:<16} {:<28} {:>8} {:>8}", "ID", "NAME", "STAGES", "N kg/ha");
    for crop in catalog.available_crops() {
        println!(
            "{:<16} {:<28} {:>8} {:>8.0}",
            crop.id,
            crop.name,
            crop.curve.as_ref().map_or(0, |c| c.stages.len()),
            crop.total_requirements.macro_total(Nutrient::N),
        );
    }
    Ok(())
}

pub fn stages(config: &Config, crop: &str) -> Result<()> {
    let catalog = load_catalog(config)?;
    let entry = catalog.require_crop(crop)?;

    let Some(curve) = &entry.curve else {
        println!("Crop '{}' has no extraction curve; whole-cycle totals apply.", entry.id);
        return Ok(());
    };

    println!("{:<14} {:<20} {}", "ID", "NAME", "CUMULATIVE %");
    for stage in &curve.stages {
        let percents = Nutrient::ALL
            .iter()
            .map(|&n| format!("{} {:.0}", n, stage.cumulative(n).unwrap_or(100.0)))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{:<14} {:<20} {}", stage.id, stage.name, percents);
    }
    Ok(())
}

pub fn delta(config: &Config, crop: &str, stage: Option<&str>) -> Result<()> {
    let catalog = load_catalog(config)?;
    let entry = catalog.require_crop(crop)?;
    let delta = stage_delta_for(entry, stage)?;

    println!(
        "{:<6} {:>8} {:>8} {:>8} {:>10}",
        "NUTR", "PREV %", "CUR %", "DELTA %", "KG/HA"
    );
    for nutrient in Nutrient::ALL {
        let d = &delta.macros[&nutrient];
        println!(
            "{:<6} {:>8.1} {:>8.1} {:>8.1} {:>10.1}",
            nutrient, d.previous_percent, d.current_percent, d.delta_percent, d.delta_amount
        );
    }
    println!("Average delta: {:.1}%", delta.average_delta_percent);

    let micros = delta.scaled_micros(&entry.total_requirements);
    let micro_line = Micronutrient::ALL
        .iter()
        .copied()
        .filter(|m| micros[m] > 0.0)
        .map(|m| format!("{} {:.0} g/ha", m, micros[&m]))
        .collect::<Vec<_>>()
        .join("  ");
    if !micro_line.is_empty() {
        println!("Micros: {}", micro_line);
    }
    Ok(())
}

pub async fn plan(
    config: &Config,
    crop: &str,
    stage: Option<&str>,
    soil: Option<&Path>,
    water: Option<&Path>,
) -> Result<()> {
    let catalog = load_catalog(config)?;
    let entry = catalog.require_crop(crop)?;
    let delta = stage_delta_for(entry, stage)?;
    let context = load_context(soil, water)?;

    let stage_name = stage
        .and_then(|id| entry.curve.as_ref().and_then(|c| c.stage(id)))
        .map(|s| s.name.clone())
        .unwrap_or_default();

    if !config.optimizer.enabled {
        return Err(FertigateError::Config(
            "optimizer is disabled; enable it in config.yaml to compute plans".into(),
        ));
    }

    let client = OptimizerClient::new(config.optimizer.clone())?;
    let micros = delta.scaled_micros(&entry.total_requirements);
    let outcome = client
        .calculate(&entry.id, &stage_name, &delta, &micros, &context)
        .await?;

    println!(
        "Fertigation program for {} / {} ({})",
        entry.name,
        if stage_name.is_empty() { "whole cycle" } else { &stage_name },
        outcome.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    let classifier = StatusClassifier::new();
    println!(
        "{:<6} {:>10} {:>8}  {:<14} {}",
        "NUTR", "NEED KG/HA", "COV %", "STATUS", "WHY"
    );
    for nutrient in Nutrient::ALL {
        let evaluation = Evaluation {
            nutrient,
            coverage: outcome.coverage_for(nutrient),
            reason: outcome.reason_for(nutrient),
            deficit: outcome.deficit_for(nutrient),
            context: &context,
            growth_stage: &stage_name,
            thresholds: &config.thresholds,
        };
        let result = classifier.classify(&evaluation);
        println!(
            "{:<6} {:>10.1} {:>8.0}  {:<14} {}",
            nutrient,
            delta.delta_amount(nutrient),
            evaluation.coverage_or_zero(),
            result.status.label(),
            result.message
        );
    }

    if !outcome.program.is_empty() {
        println!();
        println!("Fertilizers:");
        for dose in &outcome.program {
            match &dose.supplies {
                Some(supplies) => {
                    println!("  {:<28} {:>8.1} kg/ha  ({})", dose.name, dose.kg_ha, supplies)
                }
                None => println!("  {:<28} {:>8.1} kg/ha", dose.name, dose.kg_ha),
            }
        }
    }

    if let Some(acid) = &outcome.acid_treatment {
        if let Some(acid_type) = &acid.acid_type {
            println!();
            println!(
                "Acid treatment: {} (N {:.0} / P {:.0} / S {:.0} g per 1000 L)",
                acid_type, acid.n_g_per_1000l, acid.p_g_per_1000l, acid.s_g_per_1000l
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractionCurve, NutrientTotals, Stage};
    use std::collections::HashMap;

    fn entry_with_curve() -> CropEntry {
        let mut totals = NutrientTotals::default();
        totals.macros.insert(Nutrient::N, 200.0);

        let full: HashMap<Nutrient, f64> =
            Nutrient::ALL.iter().map(|&n| (n, 100.0)).collect();
        let half: HashMap<Nutrient, f64> =
            Nutrient::ALL.iter().map(|&n| (n, 50.0)).collect();

        CropEntry {
            id: "tomato".into(),
            name: "Tomato".into(),
            scientific_name: None,
            cycle_days: None,
            total_requirements: totals,
            curve: Some(ExtractionCurve {
                id: "tomato".into(),
                name: "Tomato".into(),
                stages: vec![
                    Stage {
                        id: "veg".into(),
                        name: "Vegetative".into(),
                        duration_days: None,
                        cumulative_percent: half,
                    },
                    Stage {
                        id: "harvest".into(),
                        name: "Harvest".into(),
                        duration_days: None,
                        cumulative_percent: full,
                    },
                ],
            }),
        }
    }

    #[test]
    fn crop_without_curve_falls_back_to_full_cycle() {
        let mut entry = entry_with_curve();
        entry.curve = None;
        let delta = stage_delta_for(&entry, Some("veg")).unwrap();
        assert_eq!(delta.average_delta_percent, 100.0);
        assert_eq!(delta.delta_amount(Nutrient::N), 200.0);
    }

    #[test]
    fn crop_with_curve_requires_a_stage() {
        let entry = entry_with_curve();
        assert!(matches!(
            stage_delta_for(&entry, None),
            Err(FertigateError::InvalidData(_))
        ));
    }

    #[test]
    fn unmatched_stage_lists_valid_ids() {
        let entry = entry_with_curve();
        match stage_delta_for(&entry, Some("bloom")) {
            Err(FertigateError::NotFound(msg)) => {
                assert!(msg.contains("veg, harvest"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn context_loads_from_separate_files() {
        let dir = std::env::temp_dir();
        let soil_path = dir.join(format!("fertigate_soil_{}.json", std::process::id()));
        let water_path = dir.join(format!("fertigate_water_{}.json", std::process::id()));
        std::fs::write(&soil_path, r#"{"no3_n_ppm": 42.0}"#).unwrap();
        std::fs::write(&water_path, r#"{"ph": 7.6}"#).unwrap();

        let context =
            load_context(Some(soil_path.as_path()), Some(water_path.as_path())).unwrap();
        std::fs::remove_file(&soil_path).ok();
        std::fs::remove_file(&water_path).ok();

        assert_eq!(context.soil_no3n_ppm(), 42.0);
        assert_eq!(context.water.ph, Some(7.6));
    }
}
