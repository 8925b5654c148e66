//! Swatch rendering of a trained map.
//!
//! Each neuron is drawn as a filled disc of radius 0.5 centered at lattice
//! position `(row + 0.5, col + 0.5)`, on a white background. The row runs
//! along the horizontal axis and the column along the vertical axis with
//! the origin at the bottom-left, as in a y-up plot.

use crate::config::RGB_DIM;
use crate::error::{PrismError, Result};
use crate::som::Som;
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Converts a `[0, 1]` prototype to an 8-bit color, clamping out-of-range components.
pub fn to_rgb(weights: &[f64]) -> [u8; 3] {
    let mut rgb = [0u8; 3];
    for (c, &w) in rgb.iter_mut().zip(weights) {
        *c = (w.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    rgb
}

/// Formats a prototype as `#rrggbb`.
pub fn to_hex(weights: &[f64]) -> String {
    let [r, g, b] = to_rgb(weights);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Rasterizes the map at `scale` pixels per lattice unit.
pub fn render_som(som: &Som, scale: u32) -> Result<RgbImage> {
    if som.weight_dim != RGB_DIM {
        return Err(PrismError::DimensionMismatch {
            expected: RGB_DIM,
            actual: som.weight_dim,
        });
    }
    if scale == 0 {
        return Err(PrismError::InvalidConfiguration(
            "render scale must be at least 1".to_string(),
        ));
    }

    let side = u32::try_from(som.grid_size)
        .ok()
        .and_then(|g| g.checked_mul(scale))
        .ok_or_else(|| {
            PrismError::InvalidConfiguration(format!(
                "{}x{} grid at scale {} is too large to render",
                som.grid_size, som.grid_size, scale
            ))
        })?;

    let colors: Vec<Rgb<u8>> = som
        .neurons
        .iter()
        .map(|n| Rgb(to_rgb(&n.weights)))
        .collect();
    let grid = som.grid_size as f64;
    let scale = f64::from(scale);

    Ok(ImageBuffer::from_fn(side, side, |px, py| {
        // Pixel centers in lattice units, y pointing up.
        let x = (f64::from(px) + 0.5) / scale;
        let y = grid - (f64::from(py) + 0.5) / scale;

        let row = (x.floor() as usize).min(som.grid_size - 1);
        let col = (y.floor().max(0.0) as usize).min(som.grid_size - 1);

        let dx = x - (row as f64 + 0.5);
        let dy = y - (col as f64 + 0.5);
        if dx * dx + dy * dy <= 0.25 {
            colors[som.coords_to_index(row, col)]
        } else {
            BACKGROUND
        }
    }))
}

/// Renders the map and writes it as a PNG.
pub fn save_png(som: &Som, scale: u32, path: &Path) -> Result<()> {
    let img = render_som(som, scale)?;
    img.save(path)?;
    Ok(())
}
