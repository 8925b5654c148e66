//! Configuration for the Prism color clustering engine.

use crate::error::{PrismError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of random training samples generated when no colors are supplied.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Dimensionality of an RGB color.
pub const RGB_DIM: usize = 3;

/// Main configuration for the Prism engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SOM (Self-Organizing Map) configuration.
    pub som: SomConfig,

    /// Swatch rendering configuration.
    pub render: RenderConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults. The SOM section is
    /// validated before returning.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.som.validate()?;
        Ok(config)
    }
}

/// Self-Organizing Map configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SomConfig {
    /// Grid dimension (grid is grid_size x grid_size).
    /// Default: 10.
    pub grid_size: usize,

    /// Initial neighborhood radius.
    /// Default: 5.0.
    pub sigma: f64,

    /// Initial learning rate.
    /// Default: 0.5.
    pub learning_rate: f64,

    /// Number of epochs per training call. Also the decay horizon.
    /// Default: 50.
    pub max_epochs: usize,

    /// Dimensionality of the prototype and training vectors.
    /// Default: 3 (RGB).
    pub input_dim: usize,

    /// Number of random samples drawn in random initialization mode.
    /// Default: 1000.
    pub sample_count: usize,

    /// Random seed for reproducibility.
    /// Default: None (random).
    pub seed: Option<u64>,
}

impl Default for SomConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            sigma: 5.0,
            learning_rate: 0.5,
            max_epochs: 50,
            input_dim: RGB_DIM,
            sample_count: DEFAULT_SAMPLE_COUNT,
            seed: None,
        }
    }
}

impl SomConfig {
    /// Checks every parameter against the invariants training relies on.
    pub fn validate(&self) -> Result<()> {
        validate_shape(self.grid_size, self.input_dim)?;
        validate_rates(self.sigma, self.learning_rate)?;
        if self.max_epochs == 0 {
            return Err(PrismError::InvalidConfiguration(
                "max_epochs must be at least 1".to_string(),
            ));
        }
        if self.sample_count == 0 {
            return Err(PrismError::InvalidConfiguration(
                "sample_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Swatch rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixels per lattice unit.
    /// Default: 40.
    pub scale: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: 40 }
    }
}

pub(crate) fn validate_shape(grid_size: usize, weight_dim: usize) -> Result<()> {
    if grid_size == 0 {
        return Err(PrismError::InvalidConfiguration(
            "grid_size must be at least 1".to_string(),
        ));
    }
    if weight_dim == 0 {
        return Err(PrismError::InvalidConfiguration(
            "vector dimension must be at least 1".to_string(),
        ));
    }
    let fits = grid_size
        .checked_mul(grid_size)
        .and_then(|cells| cells.checked_mul(weight_dim))
        .is_some();
    if !fits {
        return Err(PrismError::InvalidConfiguration(format!(
            "a {}x{} grid of {}-dimensional prototypes is too large",
            grid_size, grid_size, weight_dim
        )));
    }
    Ok(())
}

pub(crate) fn validate_rates(sigma: f64, learning_rate: f64) -> Result<()> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(PrismError::InvalidConfiguration(format!(
            "sigma must be positive and finite, got {}",
            sigma
        )));
    }
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(PrismError::InvalidConfiguration(format!(
            "learning_rate must be positive and finite, got {}",
            learning_rate
        )));
    }
    Ok(())
}
