//! SOM training.
//!
//! Online training: every epoch walks the training set in its original
//! order, locating the BMU for each sample and pulling the whole map
//! towards it. The learning rate and neighborhood radius decay
//! exponentially with the epoch index and restart from epoch 0 on every
//! call, so a trained map can be trained again with a fresh schedule.

use crate::config::{validate_rates, SomConfig};
use crate::error::{PrismError, Result};
use crate::som::Som;
use log::{info, warn};

/// Learning rate and neighborhood radius for one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    /// Decayed learning rate.
    pub learning_rate: f64,
    /// Decayed neighborhood radius.
    pub sigma: f64,
}

impl Decay {
    /// Decays `sigma` and `learning_rate` by `exp(-epoch / max_epochs)`.
    ///
    /// Fails when the decayed radius is so small that `2 * sigma^2` is no
    /// longer a normal float, since the Gaussian would divide by zero.
    pub fn at(epoch: usize, max_epochs: usize, sigma: f64, learning_rate: f64) -> Result<Self> {
        if max_epochs == 0 {
            return Err(PrismError::InvalidConfiguration(
                "max_epochs must be at least 1".to_string(),
            ));
        }
        validate_rates(sigma, learning_rate)?;

        let factor = (-(epoch as f64) / max_epochs as f64).exp();
        let decay = Self {
            learning_rate: learning_rate * factor,
            sigma: sigma * factor,
        };
        if !decay.two_sigma_sq().is_normal() {
            return Err(PrismError::InvalidConfiguration(format!(
                "sigma {} decays to {:e} at epoch {} of {}, too small for the neighborhood",
                sigma, decay.sigma, epoch, max_epochs
            )));
        }

        Ok(decay)
    }

    /// Denominator of the Gaussian neighborhood.
    #[inline]
    pub(crate) fn two_sigma_sq(&self) -> f64 {
        2.0 * self.sigma * self.sigma
    }
}

/// Per-epoch statistics collected during one training call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingMetrics {
    /// Mean BMU distance per epoch, measured before each sample's update.
    pub quantization_errors: Vec<f64>,
    /// Learning rates used.
    pub learning_rates: Vec<f64>,
    /// Neighborhood radii used.
    pub radii: Vec<f64>,
}

impl TrainingMetrics {
    /// Number of epochs recorded.
    pub fn epochs(&self) -> usize {
        self.learning_rates.len()
    }

    /// Quantization error of the last epoch.
    pub fn final_quantization_error(&self) -> Option<f64> {
        self.quantization_errors.last().copied()
    }
}

/// SOM trainer holding the initial learning rate and radius.
#[derive(Debug, Clone)]
pub struct SomTrainer {
    sigma: f64,
    learning_rate: f64,
}

impl SomTrainer {
    /// Creates a new trainer from the configuration's initial rates.
    pub fn new(config: &SomConfig) -> Result<Self> {
        Self::with_rates(config.sigma, config.learning_rate)
    }

    /// Creates a new trainer with explicit initial radius and learning rate.
    pub fn with_rates(sigma: f64, learning_rate: f64) -> Result<Self> {
        validate_rates(sigma, learning_rate)?;
        Ok(Self {
            sigma,
            learning_rate,
        })
    }

    /// Initial neighborhood radius.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Initial learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Decayed rates at `epoch` of `max_epochs`.
    #[inline]
    pub fn decay(&self, epoch: usize, max_epochs: usize) -> Result<Decay> {
        Decay::at(epoch, max_epochs, self.sigma, self.learning_rate)
    }

    /// Trains `som` for `max_epochs` passes over `inputs`.
    ///
    /// Runs exactly `max_epochs * inputs.len()` updates. Every input is
    /// checked against the map's dimension before the first update, so an
    /// error leaves the map untouched. `inputs` is only read.
    pub fn train(
        &self,
        som: &mut Som,
        inputs: &[Vec<f64>],
        max_epochs: usize,
    ) -> Result<TrainingMetrics> {
        if max_epochs == 0 {
            return Err(PrismError::InvalidConfiguration(
                "max_epochs must be at least 1".to_string(),
            ));
        }
        for input in inputs {
            som.check_dim(input)?;
        }
        // The radius is smallest at the last epoch.
        self.decay(max_epochs - 1, max_epochs)?;
        if inputs.is_empty() {
            warn!("Training set is empty; the map will not change");
        }

        info!(
            "Starting SOM training: {} epochs on {} samples, {}x{} grid",
            max_epochs,
            inputs.len(),
            som.grid_size,
            som.grid_size
        );

        let mut metrics = TrainingMetrics::default();
        let log_every = (max_epochs / 10).max(1);

        for epoch in 0..max_epochs {
            let decay = self.decay(epoch, max_epochs)?;
            let mut epoch_qe = 0.0;

            for input in inputs {
                let (bmu_idx, dist) = som.best_match(input)?;
                let bmu = som.index_to_coords(bmu_idx);
                som.apply_update(input, bmu, &decay);
                epoch_qe += dist;
            }

            let avg_qe = if inputs.is_empty() {
                0.0
            } else {
                epoch_qe / inputs.len() as f64
            };

            metrics.quantization_errors.push(avg_qe);
            metrics.learning_rates.push(decay.learning_rate);
            metrics.radii.push(decay.sigma);

            if epoch % log_every == 0 || epoch == max_epochs - 1 {
                info!(
                    "Epoch {}/{}: lr={:.4}, radius={:.3}, qe={:.5}",
                    epoch + 1,
                    max_epochs,
                    decay.learning_rate,
                    decay.sigma,
                    avg_qe
                );
            }
        }

        info!("SOM training completed");
        Ok(metrics)
    }
}

/// Trains `som` and hands it back, for chaining repeated training calls.
pub fn train_som(
    mut som: Som,
    inputs: &[Vec<f64>],
    config: &SomConfig,
    max_epochs: usize,
) -> Result<Som> {
    let trainer = SomTrainer::new(config)?;
    trainer.train(&mut som, inputs, max_epochs)?;
    Ok(som)
}
