use crate::error::{FertigateError, Result};
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub thresholds: ClassifierThresholds,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Crop extraction-curve catalog (JSON).
    pub path: PathBuf,
    /// Optional user-authored curves, loaded through the same types.
    #[serde(default)]
    pub custom_path: Option<PathBuf>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OptimizerConfig {
    /// Base URL of the external fertigation calculation service.
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OptimizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizerConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Heuristic thresholds for the nutrient status classifier. Defaults carry
/// the agronomic reference values; any field can be overridden in
/// config.yaml (or directly in tests).
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ClassifierThresholds {
    /// Soil NO3-N at which early-stage nitrogen is considered covered (ppm).
    #[serde(default = "default_no3n_sufficient_ppm")]
    pub no3n_sufficient_ppm: f64,
    /// Native soil K above which no additional K2O is needed (ppm).
    #[serde(default = "default_k_sufficient_ppm")]
    pub k_sufficient_ppm: f64,
    /// Coverage at which a requirement counts as essentially met (%).
    #[serde(default = "default_covered_pct")]
    pub covered_pct: f64,
    /// Coverage floor below which Ca/Mg rides on soil reserves (%).
    #[serde(default = "default_ca_mg_floor_pct")]
    pub ca_mg_floor_pct: f64,
    /// Coverage floor for the sulfur safety cap (%).
    #[serde(default = "default_s_floor_pct")]
    pub s_floor_pct: f64,
    /// Sulfur deficit ceiling for the safety cap (kg/ha).
    #[serde(default = "default_s_deficit_cap_kg_ha")]
    pub s_deficit_cap_kg_ha: f64,
}

fn default_no3n_sufficient_ppm() -> f64 {
    40.0
}

fn default_k_sufficient_ppm() -> f64 {
    400.0
}

fn default_covered_pct() -> f64 {
    85.0
}

fn default_ca_mg_floor_pct() -> f64 {
    30.0
}

fn default_s_floor_pct() -> f64 {
    50.0
}

fn default_s_deficit_cap_kg_ha() -> f64 {
    5.0
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            no3n_sufficient_ppm: default_no3n_sufficient_ppm(),
            k_sufficient_ppm: default_k_sufficient_ppm(),
            covered_pct: default_covered_pct(),
            ca_mg_floor_pct: default_ca_mg_floor_pct(),
            s_floor_pct: default_s_floor_pct(),
            s_deficit_cap_kg_ha: default_s_deficit_cap_kg_ha(),
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(FertigateError::Config(format!(
                "Config file not found at {:?}. Run `fertigate init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FertigateError::Config(format!("Failed to read config: {}", e)))?;

        // Substitute environment variables
        let config_str = Self::substitute_env_vars(&config_str);

        let config: Config = serde_yaml::from_str(&config_str)
            .map_err(|e| FertigateError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        // Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("fertigate").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        // Return XDG path as the default (will trigger "not found" in load)
        let default_path = dirs::config_dir()
            .ok_or_else(|| FertigateError::Config("Cannot determine config directory".into()))?
            .join("fertigate")
            .join("config.yaml");
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/fertigate/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FertigateError::Config("Cannot determine config directory".into()))?
            .join("fertigate");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("No configuration found. Let's set up fertigate!");
        println!();

        println!("Crop catalog");
        let catalog_path: String = Input::new()
            .with_prompt("  Extraction curve catalog (JSON)")
            .default("data/extraction_curves.json".into())
            .interact_text()
            .map_err(|e| FertigateError::Config(format!("Input error: {}", e)))?;

        let custom_path: String = Input::new()
            .with_prompt("  Custom curves file (empty for none)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| FertigateError::Config(format!("Input error: {}", e)))?;

        println!();
        println!("Calculation service");
        let optimizer_url: String = Input::new()
            .with_prompt("  Service base URL")
            .default("http://localhost:8000/api/fertiirrigation".into())
            .interact_text()
            .map_err(|e| FertigateError::Config(format!("Input error: {}", e)))?;

        let api_key: String = Input::new()
            .with_prompt("  API key (empty for none)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| FertigateError::Config(format!("Input error: {}", e)))?;

        let config = Config {
            catalog: CatalogConfig {
                path: PathBuf::from(catalog_path),
                custom_path: if custom_path.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(custom_path))
                },
            },
            optimizer: OptimizerConfig {
                url: optimizer_url,
                api_key: if api_key.is_empty() { None } else { Some(api_key) },
                timeout_secs: default_timeout_secs(),
                enabled: true,
            },
            thresholds: ClassifierThresholds::default(),
        };

        let path = Self::default_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| FertigateError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&path, yaml)?;

        println!();
        println!("Config written to {:?}", path);

        Ok((config, path))
    }

    /// Replace `${VAR_NAME}` placeholders with environment variable values.
    /// Unset variables are left as-is so the YAML parser reports them.
    fn substitute_env_vars(input: &str) -> String {
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
        re.replace_all(input, |caps: &regex_lite::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_default_to_reference_values() {
        let t = ClassifierThresholds::default();
        assert_eq!(t.no3n_sufficient_ppm, 40.0);
        assert_eq!(t.k_sufficient_ppm, 400.0);
        assert_eq!(t.covered_pct, 85.0);
        assert_eq!(t.ca_mg_floor_pct, 30.0);
        assert_eq!(t.s_floor_pct, 50.0);
        assert_eq!(t.s_deficit_cap_kg_ha, 5.0);
    }

    #[test]
    fn partial_threshold_override_keeps_defaults() {
        let yaml = r#"
catalog:
  path: data/extraction_curves.json
optimizer:
  url: http://localhost:8000/api/fertiirrigation
thresholds:
  k_sufficient_ppm: 350
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.thresholds.k_sufficient_ppm, 350.0);
        assert_eq!(config.thresholds.no3n_sufficient_ppm, 40.0);
        assert_eq!(config.optimizer.timeout_secs, 30);
        assert!(config.optimizer.enabled);
    }

    #[test]
    fn exists_checks_the_override_path() {
        let path = std::env::temp_dir().join(format!(
            "fertigate_config_{}.yaml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "catalog:\n  path: data/extraction_curves.json\noptimizer:\n  url: http://localhost\n",
        )
        .unwrap();
        assert!(Config::exists(Some(&path)));

        std::fs::remove_file(&path).ok();
        assert!(!Config::exists(Some(&path)));
    }

    #[test]
    fn env_var_substitution() {
        std::env::set_var("FERTIGATE_TEST_URL", "http://svc:9000");
        let out = Config::substitute_env_vars("url: ${FERTIGATE_TEST_URL}");
        assert_eq!(out, "url: http://svc:9000");

        let untouched = Config::substitute_env_vars("url: ${FERTIGATE_UNSET_VAR_XYZ}");
        assert_eq!(untouched, "url: ${FERTIGATE_UNSET_VAR_XYZ}");
    }
}
