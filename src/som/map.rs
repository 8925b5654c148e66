//! Self-Organizing Map (SOM) implementation.

use crate::config::{validate_shape, SomConfig};
use crate::error::{PrismError, Result};
use crate::som::training::Decay;
use crate::som::Neuron;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A square Self-Organizing Map.
///
/// The map is a `grid_size x grid_size` lattice of neurons stored in
/// row-major order. Lattice positions never change; only the prototype
/// vectors are adapted during training.
#[derive(Debug, Clone, PartialEq)]
pub struct Som {
    /// Grid dimension (grid is grid_size x grid_size).
    pub grid_size: usize,
    /// The neurons in the grid (row-major order).
    pub neurons: Vec<Neuron>,
    /// Prototype vector dimensionality.
    pub weight_dim: usize,
}

impl Som {
    /// Creates a new SOM with weights drawn uniformly from `[0, 1)`.
    ///
    /// Uses `config.seed` when present, entropy otherwise.
    pub fn new(config: &SomConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self::new_random(config.grid_size, config.input_dim, &mut rng)
    }

    /// Creates a new SOM with weights drawn uniformly from `[0, 1)` using the given RNG.
    pub fn new_random<R: Rng>(grid_size: usize, weight_dim: usize, rng: &mut R) -> Result<Self> {
        validate_shape(grid_size, weight_dim)?;

        let neurons: Vec<Neuron> = (0..grid_size * grid_size)
            .map(|i| {
                let row = i / grid_size;
                let col = i % grid_size;
                Neuron::new_random(row, col, weight_dim, rng)
            })
            .collect();

        Ok(Self {
            grid_size,
            neurons,
            weight_dim,
        })
    }

    /// Creates a new SOM with zero-initialized weights.
    pub fn new_zeros(grid_size: usize, weight_dim: usize) -> Result<Self> {
        validate_shape(grid_size, weight_dim)?;

        let neurons: Vec<Neuron> = (0..grid_size * grid_size)
            .map(|i| {
                let row = i / grid_size;
                let col = i % grid_size;
                Neuron::new_zeros(row, col, weight_dim)
            })
            .collect();

        Ok(Self {
            grid_size,
            neurons,
            weight_dim,
        })
    }

    /// Creates a SOM from explicit prototypes given in row-major order.
    ///
    /// Exactly `grid_size * grid_size` prototypes of equal, non-zero
    /// length are required.
    pub fn from_weights(grid_size: usize, weights: Vec<Vec<f64>>) -> Result<Self> {
        let weight_dim = weights.first().map(Vec::len).unwrap_or(0);
        validate_shape(grid_size, weight_dim)?;

        if weights.len() != grid_size * grid_size {
            return Err(PrismError::InvalidConfiguration(format!(
                "expected {} prototypes for a {}x{} grid, got {}",
                grid_size * grid_size,
                grid_size,
                grid_size,
                weights.len()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| w.len() != weight_dim) {
            return Err(PrismError::DimensionMismatch {
                expected: weight_dim,
                actual: bad.len(),
            });
        }

        let neurons = weights
            .into_iter()
            .enumerate()
            .map(|(i, w)| Neuron::new_with_weights(i / grid_size, i % grid_size, w))
            .collect();

        Ok(Self {
            grid_size,
            neurons,
            weight_dim,
        })
    }

    /// Returns the total number of neurons.
    #[inline]
    pub fn total_neurons(&self) -> usize {
        self.neurons.len()
    }

    /// Gets a neuron by its 2D position.
    #[inline]
    pub fn get_at(&self, row: usize, col: usize) -> Option<&Neuron> {
        if row < self.grid_size && col < self.grid_size {
            Some(&self.neurons[row * self.grid_size + col])
        } else {
            None
        }
    }

    /// Gets a mutable reference to a neuron by its 2D position.
    #[inline]
    pub fn get_at_mut(&mut self, row: usize, col: usize) -> Option<&mut Neuron> {
        if row < self.grid_size && col < self.grid_size {
            Some(&mut self.neurons[row * self.grid_size + col])
        } else {
            None
        }
    }

    /// Prototype vector at `(row, col)`.
    ///
    /// Renderers draw it as a disc of radius 0.5 centered at `(row + 0.5, col + 0.5)`.
    #[inline]
    pub fn weights_at(&self, row: usize, col: usize) -> Option<&[f64]> {
        self.get_at(row, col).map(|n| n.weights.as_slice())
    }

    /// All lattice coordinates in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neurons.iter().map(|n| (n.row, n.col))
    }

    /// Finds the Best Matching Unit (BMU) for an input vector.
    ///
    /// Ties resolve to the first neuron in row-major order.
    pub fn find_bmu(&self, input: &[f64]) -> Result<(usize, usize)> {
        let (index, _) = self.best_match(input)?;
        Ok(self.index_to_coords(index))
    }

    /// Returns the 1D index of the BMU and its Euclidean distance to `input`.
    pub fn best_match(&self, input: &[f64]) -> Result<(usize, f64)> {
        self.check_dim(input)?;

        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;

        for (i, neuron) in self.neurons.iter().enumerate() {
            let dist = neuron.distance(input);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        Ok((best_idx, best_dist))
    }

    /// Mean distance between each input and its BMU.
    ///
    /// Returns 0.0 for an empty set.
    pub fn quantization_error(&self, inputs: &[Vec<f64>]) -> Result<f64> {
        if inputs.is_empty() {
            return Ok(0.0);
        }

        let mut total = 0.0;
        for input in inputs {
            let (_, dist) = self.best_match(input)?;
            total += dist;
        }

        Ok(total / inputs.len() as f64)
    }

    /// Pulls every neuron towards `input` around the BMU.
    ///
    /// The learning rate and radius are decayed once for this call from
    /// `epoch / max_epochs`. All neurons are visited; none are skipped for
    /// being far from the BMU.
    pub fn update_weights(
        &mut self,
        input: &[f64],
        bmu: (usize, usize),
        epoch: usize,
        max_epochs: usize,
        sigma: f64,
        learning_rate: f64,
    ) -> Result<()> {
        self.check_dim(input)?;
        if bmu.0 >= self.grid_size || bmu.1 >= self.grid_size {
            return Err(PrismError::InvalidConfiguration(format!(
                "BMU ({}, {}) outside {}x{} grid",
                bmu.0, bmu.1, self.grid_size, self.grid_size
            )));
        }

        let decay = Decay::at(epoch, max_epochs, sigma, learning_rate)?;
        self.apply_update(input, bmu, &decay);
        Ok(())
    }

    /// Update pass with an already computed decay; callers check dimensions.
    pub(crate) fn apply_update(&mut self, input: &[f64], bmu: (usize, usize), decay: &Decay) {
        let two_sigma_sq = decay.two_sigma_sq();

        for neuron in &mut self.neurons {
            let grid_dist = neuron.grid_distance(bmu.0, bmu.1);
            let neighborhood = (-(grid_dist * grid_dist) / two_sigma_sq).exp();
            neuron.update_weights(input, decay.learning_rate, neighborhood);
        }
    }

    /// Converts a 1D index to 2D coordinates.
    #[inline]
    pub fn index_to_coords(&self, index: usize) -> (usize, usize) {
        (index / self.grid_size, index % self.grid_size)
    }

    /// Converts 2D coordinates to a 1D index.
    #[inline]
    pub fn coords_to_index(&self, row: usize, col: usize) -> usize {
        row * self.grid_size + col
    }

    pub(crate) fn check_dim(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.weight_dim {
            return Err(PrismError::DimensionMismatch {
                expected: self.weight_dim,
                actual: input.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SomConfig {
        SomConfig {
            grid_size: 8,
            input_dim: 3,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_som_creation() {
        let som = Som::new(&test_config()).unwrap();

        assert_eq!(som.grid_size, 8);
        assert_eq!(som.total_neurons(), 64);
        assert_eq!(som.weight_dim, 3);
        assert!(som
            .neurons
            .iter()
            .all(|n| n.weights.iter().all(|&w| (0.0..1.0).contains(&w))));
    }

    #[test]
    fn test_seeded_creation_is_reproducible() {
        let a = Som::new(&test_config()).unwrap();
        let b = Som::new(&test_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_shape() {
        assert!(matches!(
            Som::new_zeros(0, 3),
            Err(PrismError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Som::new_zeros(4, 0),
            Err(PrismError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let huge = usize::MAX / 2;
        assert!(matches!(
            Som::new_zeros(huge, 1),
            Err(PrismError::InvalidConfiguration(_))
        ));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            Som::new_random(huge, 3, &mut rng),
            Err(PrismError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Som::from_weights(huge, vec![vec![0.0]]),
            Err(PrismError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_neuron_positions() {
        let som = Som::new(&test_config()).unwrap();

        for (i, neuron) in som.neurons.iter().enumerate() {
            assert_eq!(neuron.row, i / 8);
            assert_eq!(neuron.col, i % 8);
        }

        let coords: Vec<_> = som.coordinates().take(3).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_from_weights() {
        let som = Som::from_weights(
            2,
            vec![vec![0.1], vec![0.2], vec![0.3], vec![0.4]],
        )
        .unwrap();
        assert_eq!(som.weights_at(1, 0), Some(&[0.3][..]));
        assert_eq!(som.weights_at(2, 0), None);

        assert!(matches!(
            Som::from_weights(2, vec![vec![0.1]; 3]),
            Err(PrismError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Som::from_weights(1, vec![]),
            Err(PrismError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_find_bmu() {
        let mut som = Som::new_zeros(4, 3).unwrap();
        som.neurons[5].weights = vec![1.0, 0.0, 0.0];

        let bmu = som.find_bmu(&[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(bmu, (1, 1));
    }

    #[test]
    fn test_find_bmu_tie_prefers_row_major_first() {
        let mut som = Som::new_zeros(3, 3).unwrap();
        for n in &mut som.neurons {
            n.weights = vec![0.5, 0.5, 0.5];
        }
        som.get_at_mut(2, 1).unwrap().weights = vec![1.0, 0.0, 0.0];
        som.get_at_mut(1, 2).unwrap().weights = vec![1.0, 0.0, 0.0];

        assert_eq!(som.find_bmu(&[1.0, 0.0, 0.0]).unwrap(), (1, 2));

        // All-equal grid resolves to the origin.
        let flat = Som::new_zeros(3, 3).unwrap();
        assert_eq!(flat.find_bmu(&[0.3, 0.3, 0.3]).unwrap(), (0, 0));
    }

    #[test]
    fn test_find_bmu_dimension_mismatch() {
        let som = Som::new_zeros(2, 3).unwrap();
        assert!(matches!(
            som.find_bmu(&[1.0, 0.0]),
            Err(PrismError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_update_at_epoch_zero() {
        let mut som = Som::new_zeros(3, 3).unwrap();
        som.update_weights(&[1.0, 1.0, 1.0], (1, 1), 0, 10, 1.0, 0.5)
            .unwrap();

        // BMU moves by exactly the learning rate.
        let bmu = som.weights_at(1, 1).unwrap();
        assert!((bmu[0] - 0.5).abs() < 1e-12);

        // Direct neighbor: influence exp(-1/2).
        let expected = 0.5 * (-0.5f64).exp();
        let side = som.weights_at(0, 1).unwrap();
        assert!((side[2] - expected).abs() < 1e-12);

        // Corner still moves; no pruning by radius.
        let corner = som.weights_at(0, 0).unwrap();
        assert!(corner[0] > 0.0 && corner[0] < side[0]);
    }

    #[test]
    fn test_update_rejects_vanishing_radius() {
        let mut som = Som::new_zeros(3, 3).unwrap();
        assert!(matches!(
            som.update_weights(&[0.5; 3], (0, 0), 1000, 1, 1.0, 0.5),
            Err(PrismError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            som.update_weights(&[0.5; 3], (0, 0), 0, 1, 1e-170, 0.5),
            Err(PrismError::InvalidConfiguration(_))
        ));
        assert_eq!(som, Som::new_zeros(3, 3).unwrap());
    }

    #[test]
    fn test_update_rejects_bad_input() {
        let mut som = Som::new_zeros(3, 3).unwrap();
        assert!(matches!(
            som.update_weights(&[1.0, 1.0, 1.0], (0, 0), 0, 0, 1.0, 0.5),
            Err(PrismError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            som.update_weights(&[1.0, 1.0], (0, 0), 0, 1, 1.0, 0.5),
            Err(PrismError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            som.update_weights(&[1.0, 1.0, 1.0], (3, 0), 0, 1, 1.0, 0.5),
            Err(PrismError::InvalidConfiguration(_))
        ));
        assert_eq!(som, Som::new_zeros(3, 3).unwrap());
    }

    #[test]
    fn test_quantization_error() {
        let mut som = Som::new_zeros(1, 2).unwrap();
        som.neurons[0].weights = vec![0.0, 0.0];

        let inputs = vec![vec![3.0, 4.0], vec![0.0, 1.0]];
        let qe = som.quantization_error(&inputs).unwrap();
        assert!((qe - 3.0).abs() < 1e-12);
        assert_eq!(som.quantization_error(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_coordinate_conversion() {
        let som = Som::new(&test_config()).unwrap();

        assert_eq!(som.index_to_coords(10), (1, 2));
        assert_eq!(som.coords_to_index(1, 2), 10);
    }
}
