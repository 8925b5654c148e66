//! Neuron representation for the Self-Organizing Map.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// A neuron in the Self-Organizing Map.
///
/// Each neuron has a fixed position on the 2D lattice and a prototype
/// vector that is pulled towards the inputs it wins or neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    /// Row position on the grid.
    pub row: usize,
    /// Column position on the grid.
    pub col: usize,
    /// Prototype vector.
    pub weights: Vec<f64>,
}

impl Neuron {
    /// Creates a new neuron with weights drawn uniformly from `[0, 1)`.
    pub fn new_random<R: Rng>(row: usize, col: usize, weight_dim: usize, rng: &mut R) -> Self {
        let uniform = Uniform::new(0.0, 1.0);
        let weights: Vec<f64> = (0..weight_dim).map(|_| uniform.sample(rng)).collect();

        Self { row, col, weights }
    }

    /// Creates a new neuron with zero weights.
    pub fn new_zeros(row: usize, col: usize, weight_dim: usize) -> Self {
        Self {
            row,
            col,
            weights: vec![0.0; weight_dim],
        }
    }

    /// Creates a new neuron with the given weights.
    pub fn new_with_weights(row: usize, col: usize, weights: Vec<f64>) -> Self {
        Self { row, col, weights }
    }

    /// Computes the Euclidean distance between this neuron's weights and an input vector.
    #[inline]
    pub fn distance(&self, input: &[f64]) -> f64 {
        self.distance_squared(input).sqrt()
    }

    /// Computes the squared Euclidean distance.
    #[inline]
    pub fn distance_squared(&self, input: &[f64]) -> f64 {
        debug_assert_eq!(
            self.weights.len(),
            input.len(),
            "Weight and input dimensions must match"
        );

        self.weights
            .iter()
            .zip(input.iter())
            .map(|(w, i)| (w - i) * (w - i))
            .sum()
    }

    /// Squared lattice distance to the cell at `(row, col)`.
    #[inline]
    pub fn grid_distance_squared(&self, row: usize, col: usize) -> f64 {
        let dr = self.row as f64 - row as f64;
        let dc = self.col as f64 - col as f64;
        dr * dr + dc * dc
    }

    /// Lattice distance to the cell at `(row, col)`.
    #[inline]
    pub fn grid_distance(&self, row: usize, col: usize) -> f64 {
        self.grid_distance_squared(row, col).sqrt()
    }

    /// Moves the weights towards an input vector.
    ///
    /// `learning_rate` is the decayed learning rate.
    /// `neighborhood` is the neighborhood influence (0.0 to 1.0).
    pub fn update_weights(&mut self, input: &[f64], learning_rate: f64, neighborhood: f64) {
        let influence = neighborhood * learning_rate;

        for (w, i) in self.weights.iter_mut().zip(input.iter()) {
            *w += influence * (i - *w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_neuron_creation() {
        let neuron = Neuron::new_zeros(5, 10, 3);
        assert_eq!(neuron.row, 5);
        assert_eq!(neuron.col, 10);
        assert_eq!(neuron.weights.len(), 3);
        assert!(neuron.weights.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_random_initialization_in_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let neuron = Neuron::new_random(0, 0, 100, &mut rng);
        assert_eq!(neuron.weights.len(), 100);
        assert!(neuron.weights.iter().all(|&w| (0.0..1.0).contains(&w)));
        assert!(neuron.weights.iter().any(|&w| w != 0.0));
    }

    #[test]
    fn test_distance() {
        let neuron = Neuron::new_with_weights(0, 0, vec![1.0, 0.0, 0.0]);
        let dist = neuron.distance(&[0.0, 1.0, 0.0]);
        assert!((dist - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_grid_distance() {
        let neuron = Neuron::new_zeros(0, 0, 3);
        assert!((neuron.grid_distance(3, 4) - 5.0).abs() < 1e-10); // 3-4-5 triangle
        assert_eq!(neuron.grid_distance_squared(3, 4), 25.0);
    }

    #[test]
    fn test_update_weights() {
        let mut neuron = Neuron::new_with_weights(0, 0, vec![0.0, 0.0, 0.0]);
        neuron.update_weights(&[1.0, 1.0, 1.0], 0.5, 1.0);
        assert!((neuron.weights[0] - 0.5).abs() < 1e-10);

        neuron.update_weights(&[1.0, 1.0, 1.0], 0.5, 0.5);
        assert!((neuron.weights[1] - 0.625).abs() < 1e-10);
    }
}
