use crate::error::{FertigateError, Result};
use crate::models::{DurationDays, ExtractionCurve, NutrientTotals, Stage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Crop catalog: whole-cycle requirements plus the cumulative extraction
/// curve per crop. Stages are stored as an ordered array in the JSON so
/// phenological order survives deserialization.
pub struct CurveCatalog {
    crops: Vec<CropEntry>,
}

#[derive(Debug, Clone)]
pub struct CropEntry {
    pub id: String,
    pub name: String,
    pub scientific_name: Option<String>,
    pub cycle_days: Option<DurationDays>,
    pub total_requirements: NutrientTotals,
    /// `None` when the crop ships without a curve; callers fall back to
    /// whole-cycle totals.
    pub curve: Option<ExtractionCurve>,
}

#[derive(Serialize, Deserialize)]
struct CatalogFile {
    crops: Vec<CropFileEntry>,
}

#[derive(Serialize, Deserialize)]
struct CropFileEntry {
    id: String,
    name: String,
    #[serde(default)]
    scientific_name: Option<String>,
    #[serde(default)]
    cycle_days: Option<DurationDays>,
    #[serde(default)]
    total_requirements: NutrientTotals,
    #[serde(default)]
    stages: Vec<Stage>,
}

impl From<CropFileEntry> for CropEntry {
    fn from(entry: CropFileEntry) -> Self {
        let curve = if entry.stages.is_empty() {
            None
        } else {
            Some(ExtractionCurve {
                id: entry.id.clone(),
                name: entry.name.clone(),
                stages: entry.stages,
            })
        };

        CropEntry {
            id: entry.id,
            name: entry.name,
            scientific_name: entry.scientific_name,
            cycle_days: entry.cycle_days,
            total_requirements: entry.total_requirements,
            curve,
        }
    }
}

impl CurveCatalog {
    /// Load the catalog, optionally merging a user-authored curves file.
    /// Custom crops use the exact same file format and resolve through the
    /// same code path; a custom crop shadowing a catalog id replaces it.
    pub fn load(path: &Path, custom_path: Option<&Path>) -> Result<Self> {
        let mut crops = Self::read_file(path)?;

        if let Some(custom) = custom_path {
            let custom_crops = Self::read_file(custom)?;
            for crop in custom_crops {
                crops.retain(|c: &CropEntry| c.id != crop.id);
                crops.push(crop);
            }
        }

        let catalog = Self { crops };
        for warning in catalog.validate_all() {
            tracing::warn!("{}", warning);
        }
        Ok(catalog)
    }

    fn read_file(path: &Path) -> Result<Vec<CropEntry>> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            FertigateError::Config(format!("Failed to read catalog {:?}: {}", path, e))
        })?;
        let file: CatalogFile = serde_json::from_str(&raw)?;
        Ok(file.crops.into_iter().map(CropEntry::from).collect())
    }

    pub fn available_crops(&self) -> &[CropEntry] {
        &self.crops
    }

    pub fn crop(&self, crop_id: &str) -> Option<&CropEntry> {
        let crop_id = crop_id.to_lowercase();
        self.crops.iter().find(|c| c.id.to_lowercase() == crop_id)
    }

    pub fn require_crop(&self, crop_id: &str) -> Result<&CropEntry> {
        self.crop(crop_id)
            .ok_or_else(|| FertigateError::NotFound(format!("crop '{}'", crop_id)))
    }

    /// Authoring-time warnings for every curve in the catalog.
    pub fn validate_all(&self) -> Vec<String> {
        self.crops
            .iter()
            .filter_map(|c| c.curve.as_ref())
            .flat_map(|curve| curve.validate())
            .collect()
    }
}
