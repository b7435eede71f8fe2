use anyhow::{Context as _, Result};
use probe_model_core::{AirConstants, AngleGrid, CalibrationGrid, ProbeGeometry, SolverConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub geometry: ProbeGeometry,
    pub solver: SolverConfig,
    pub air: AirConstants,
    pub calibration: CalibrationGrid,
    pub pressure_table: AngleGrid,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            geometry: ProbeGeometry::V2,
            solver: SolverConfig::default(),
            air: AirConstants::default(),
            calibration: CalibrationGrid::default(),
            pressure_table: AngleGrid::default(),
        }
    }
}

impl ProbeConfig {
    pub fn default_path() -> PathBuf {
        ".probe-cli.toml".into()
    }

    /// Loads the config at `path`, writing the defaults there first if it
    /// doesn't exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, config_str)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    /// command line geometry wins over the configured one
    pub fn geometry_or(&self, geometry: Option<ProbeGeometry>) -> ProbeGeometry {
        geometry.unwrap_or(self.geometry)
    }
}
