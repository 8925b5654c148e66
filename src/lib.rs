//! # Prism - Color clustering with a Kohonen network
//!
//! Prism trains a Self-Organizing Map (SOM) on RGB colors: a square
//! lattice of prototype vectors that, after training, lays similar colors
//! out next to each other.
//!
//! ## Overview
//!
//! Training is the classic online algorithm. For every epoch and every
//! input color, the Best Matching Unit (the neuron whose prototype is
//! closest in Euclidean distance) is located and every neuron is pulled
//! towards the input, weighted by a Gaussian of its lattice distance to the
//! BMU. Learning rate and neighborhood radius both decay by
//! `exp(-epoch / max_epochs)`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prism::{initialize_from_vectors, SomConfig, SomTrainer};
//!
//! # fn main() -> prism::Result<()> {
//! let config = SomConfig { grid_size: 8, ..Default::default() };
//! let colors = vec![vec![255, 0, 0], vec![0, 255, 0], vec![0, 0, 255]];
//!
//! let (mut som, inputs) = initialize_from_vectors(&config, &colors)?;
//! let trainer = SomTrainer::new(&config)?;
//! trainer.train(&mut som, &inputs, config.max_epochs)?;
//!
//! let corner = som.weights_at(0, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`som`] - the map, BMU search, neighborhood update, training and initialization
//! - [`render`] - rasterizing a map as color swatches
//! - [`config`] - parameters and their defaults
//! - [`error`] - error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod render;
pub mod som;

// Re-export commonly used types
pub use config::{Config, RenderConfig, SomConfig, DEFAULT_SAMPLE_COUNT, RGB_DIM};
pub use error::{PrismError, Result};
pub use som::{
    initialize_from_vectors, initialize_random, normalize_color, train_som, Decay, Neuron, Som,
    SomTrainer, TrainingMetrics, TrainingSet,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
