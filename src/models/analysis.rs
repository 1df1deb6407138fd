use serde::{Deserialize, Serialize};

/// Soil analysis snapshot as supplied by the caller.
///
/// Upstream records carry two historical spellings for some fields
/// (`no3n_ppm`/`no3_n_ppm`, `k_ppm`/`potassium_ppm`); the aliases normalize
/// them into one canonical field at deserialization so the classifier only
/// ever sees a single name. Missing numeric fields read as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoilAnalysis {
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default, alias = "no3_n_ppm")]
    pub no3n_ppm: Option<f64>,
    #[serde(default, alias = "potassium_ppm")]
    pub k_ppm: Option<f64>,
    #[serde(default)]
    pub p_ppm: Option<f64>,
    #[serde(default)]
    pub ca_ppm: Option<f64>,
    #[serde(default)]
    pub mg_ppm: Option<f64>,
    #[serde(default)]
    pub organic_matter_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterAnalysis {
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default)]
    pub ec_ds_m: Option<f64>,
    #[serde(default, alias = "hco3_ppm")]
    pub bicarbonate_ppm: Option<f64>,
    #[serde(default)]
    pub no3_ppm: Option<f64>,
    #[serde(default)]
    pub ca_ppm: Option<f64>,
    #[serde(default)]
    pub mg_ppm: Option<f64>,
    #[serde(default)]
    pub k_ppm: Option<f64>,
    #[serde(default)]
    pub s_ppm: Option<f64>,
}

/// Read-only soil + water snapshot used per calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgronomicContext {
    #[serde(default)]
    pub soil: SoilAnalysis,
    #[serde(default)]
    pub water: WaterAnalysis,
}

impl AgronomicContext {
    pub fn soil_no3n_ppm(&self) -> f64 {
        self.soil.no3n_ppm.unwrap_or(0.0)
    }

    pub fn soil_k_ppm(&self) -> f64 {
        self.soil.k_ppm.unwrap_or(0.0)
    }
}
