//! Map and training set initialization.
//!
//! Two modes are supported. Random mode draws uniform prototypes and a set
//! of random colors. Seeded mode trains on caller-supplied colors and
//! copies them onto the lattice as starting prototypes, cycling through the
//! list in row-major order.

use crate::config::SomConfig;
use crate::error::{PrismError, Result};
use crate::som::Som;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest raw color component.
pub const MAX_COMPONENT: i32 = 255;

/// Ordered training vectors, normalized to `[0, 1]`.
pub type TrainingSet = Vec<Vec<f64>>;

/// Maps a raw color with components in `[0, 255]` onto `[0, 1]`.
pub fn normalize_color(raw: &[i32]) -> Result<Vec<f64>> {
    raw.iter()
        .map(|&c| {
            if !(0..=MAX_COMPONENT).contains(&c) {
                return Err(PrismError::OutOfRange {
                    value: i64::from(c),
                    min: 0,
                    max: i64::from(MAX_COMPONENT),
                });
            }
            Ok(f64::from(c) / f64::from(MAX_COMPONENT))
        })
        .collect()
}

/// Builds a random map and `sample_count` random training colors.
///
/// Prototypes are uniform in `[0, 1)`; samples are uniform integers in
/// `[0, 255]` divided by 255. A single generator, seeded from
/// `config.seed` when present, draws the prototypes first and then the
/// samples.
pub fn initialize_random(config: &SomConfig, sample_count: usize) -> Result<(Som, TrainingSet)> {
    if sample_count == 0 {
        return Err(PrismError::InvalidConfiguration(
            "sample_count must be at least 1".to_string(),
        ));
    }

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let som = Som::new_random(config.grid_size, config.input_dim, &mut rng)?;

    let scale = f64::from(MAX_COMPONENT);
    let samples: TrainingSet = (0..sample_count)
        .map(|_| {
            (0..config.input_dim)
                .map(|_| f64::from(rng.gen_range(0..=MAX_COMPONENT)) / scale)
                .collect()
        })
        .collect();

    debug!(
        "Random initialization: {}x{} grid, {} samples",
        config.grid_size, config.grid_size, sample_count
    );

    Ok((som, samples))
}

/// Builds a map seeded from caller-supplied colors.
///
/// The training set is `raw` normalized, in the same order. The prototype
/// at `(i, j)` is the normalized color at `(i * grid_size + j) % raw.len()`.
pub fn initialize_from_vectors(
    config: &SomConfig,
    raw: &[Vec<i32>],
) -> Result<(Som, TrainingSet)> {
    if raw.is_empty() {
        return Err(PrismError::InvalidConfiguration(
            "at least one input vector is required".to_string(),
        ));
    }
    if let Some(bad) = raw.iter().find(|v| v.len() != config.input_dim) {
        return Err(PrismError::InvalidConfiguration(format!(
            "input vectors must have {} components, got {}",
            config.input_dim,
            bad.len()
        )));
    }

    let samples = raw
        .iter()
        .map(|v| normalize_color(v))
        .collect::<Result<TrainingSet>>()?;

    let mut som = Som::new_zeros(config.grid_size, config.input_dim)?;
    let grid_size = som.grid_size;
    for neuron in &mut som.neurons {
        let index = (neuron.row * grid_size + neuron.col) % samples.len();
        neuron.weights.copy_from_slice(&samples[index]);
    }

    debug!(
        "Seeded initialization: {}x{} grid from {} vectors",
        grid_size,
        grid_size,
        samples.len()
    );

    Ok((som, samples))
}
