//! Self-Organizing Map (SOM) module for color clustering.
//!
//! - **Map**: the lattice of neurons, BMU search and the neighborhood update (map.rs)
//! - **Training**: the epoch loop and decay schedule (training.rs)
//! - **Initialization**: random and color-seeded maps (init.rs)

mod map;
mod neuron;
pub mod init;
pub mod training;

pub use init::{initialize_from_vectors, initialize_random, normalize_color, TrainingSet};
pub use map::Som;
pub use neuron::Neuron;
pub use training::{train_som, Decay, SomTrainer, TrainingMetrics};
