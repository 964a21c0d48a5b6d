use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{HydroError, HydroResult};

/// Reads a load configuration from a YAML file.
///
/// A relative `coefficients` path is resolved against the directory holding
/// the configuration file.
pub fn read_config_from_file(path: impl AsRef<Path>) -> HydroResult<HydroConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| HydroError::file(path, e))?;
    let mut config = parse_config(&text)?;
    if config.coefficients.is_relative() {
        if let Some(dir) = path.parent() {
            config.coefficients = dir.join(&config.coefficients);
        }
    }
    Ok(config)
}

/// Parses a load configuration from YAML text.
pub fn parse_config(text: &str) -> HydroResult<HydroConfig> {
    let config: HydroConfig =
        serde_yaml::from_str(text).map_err(|e| HydroError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[derive(Debug, Clone, Deserialize)]
pub struct HydroConfig {
    /// Coefficient file, format chosen by extension
    pub coefficients: PathBuf,
    /// Body identifier, the top-level group of the coefficient file
    pub body: String,
    #[serde(default)]
    pub forces: ForceSelection,
}

impl HydroConfig {
    pub fn new(coefficients: impl Into<PathBuf>, body: &str) -> Self {
        Self {
            coefficients: coefficients.into(),
            body: body.to_string(),
            forces: ForceSelection::default(),
        }
    }

    fn validate(&self) -> HydroResult<()> {
        if self.body.trim().is_empty() {
            return Err(HydroError::Config("body identifier is empty".to_string()));
        }
        if self.coefficients.as_os_str().is_empty() {
            return Err(HydroError::Config("coefficient path is empty".to_string()));
        }
        Ok(())
    }
}

/// Which load components to create; all enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForceSelection {
    pub restoring: bool,
    pub buoyancy: bool,
    pub radiation: bool,
    pub added_mass: bool,
}

impl Default for ForceSelection {
    fn default() -> Self {
        Self {
            restoring: true,
            buoyancy: true,
            radiation: true,
            added_mass: true,
        }
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------
