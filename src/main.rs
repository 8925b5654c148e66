//! Prism CLI - color clustering with a Kohonen network
//!
//! Command-line front end: collects parameters and colors, trains a map and
//! writes before/after swatch images.

use clap::{Parser, Subcommand};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use log::error;
use prism::error::PrismError;
use prism::render::{save_png, to_hex};
use prism::{
    initialize_from_vectors, initialize_random, Config, Result, Som, SomTrainer, TrainingSet,
    RGB_DIM,
};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "prism")]
#[command(author = "Prism Contributors")]
#[command(version)]
#[command(about = "Color clustering using a Kohonen network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a map on random or user-supplied colors
    Train {
        /// JSON configuration file; flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Grid dimension (default: 10)
        #[arg(short, long)]
        grid_size: Option<usize>,

        /// Initial neighborhood radius (default: 5.0)
        #[arg(short, long)]
        sigma: Option<f64>,

        /// Initial learning rate (default: 0.5)
        #[arg(short, long)]
        learning_rate: Option<f64>,

        /// Epochs per training run (default: 50)
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Number of random colors when none are given (default: 1000)
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Custom input colors, e.g. "255,0,0;0,255,0;0,0,255"
        #[arg(long)]
        colors: Option<String>,

        /// File with one "r,g,b" color per line ('#' starts a comment)
        #[arg(long)]
        colors_file: Option<PathBuf>,

        /// Additional training runs on the trained map, each restarting the decay
        #[arg(short, long, default_value = "0")]
        repeat: usize,

        /// Write the initial map as a PNG
        #[arg(long)]
        before: Option<PathBuf>,

        /// Write the trained map as a PNG
        #[arg(long)]
        after: Option<PathBuf>,

        /// Pixels per grid cell in rendered images (default: 40)
        #[arg(long)]
        scale: Option<u32>,

        /// Print every cell of the trained map as "row col #rrggbb"
        #[arg(short, long)]
        print: bool,
    },
}

/// Options of the `train` command.
struct TrainArgs {
    config: Option<PathBuf>,
    grid_size: Option<usize>,
    sigma: Option<f64>,
    learning_rate: Option<f64>,
    epochs: Option<usize>,
    samples: Option<usize>,
    seed: Option<u64>,
    colors: Option<String>,
    colors_file: Option<PathBuf>,
    repeat: usize,
    before: Option<PathBuf>,
    after: Option<PathBuf>,
    scale: Option<u32>,
    print: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Train {
            config,
            grid_size,
            sigma,
            learning_rate,
            epochs,
            samples,
            seed,
            colors,
            colors_file,
            repeat,
            before,
            after,
            scale,
            print,
        } => train_colors(TrainArgs {
            config,
            grid_size,
            sigma,
            learning_rate,
            epochs,
            samples,
            seed,
            colors,
            colors_file,
            repeat,
            before,
            after,
            scale,
            print,
        }),
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &TrainArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(v) = args.grid_size {
        config.som.grid_size = v;
    }
    if let Some(v) = args.sigma {
        config.som.sigma = v;
    }
    if let Some(v) = args.learning_rate {
        config.som.learning_rate = v;
    }
    if let Some(v) = args.epochs {
        config.som.max_epochs = v;
    }
    if let Some(v) = args.samples {
        config.som.sample_count = v;
    }
    if args.seed.is_some() {
        config.som.seed = args.seed;
    }
    if let Some(v) = args.scale {
        config.render.scale = v;
    }

    config.som.validate()?;
    if config.som.input_dim != RGB_DIM {
        return Err(PrismError::InvalidConfiguration(format!(
            "colors have {} components, input_dim is {}",
            RGB_DIM, config.som.input_dim
        )));
    }

    Ok(config)
}

/// Parses one "r,g,b" color.
fn parse_color(s: &str) -> Result<Vec<i32>> {
    let color = s
        .split(',')
        .map(|part| {
            part.trim().parse::<i32>().map_err(|e| {
                PrismError::Parse(format!(
                    "invalid component '{}' in '{}': {}",
                    part.trim(),
                    s,
                    e
                ))
            })
        })
        .collect::<Result<Vec<i32>>>()?;

    if color.len() != RGB_DIM {
        return Err(PrismError::Parse(format!(
            "expected {} components in '{}', got {}",
            RGB_DIM,
            s,
            color.len()
        )));
    }

    Ok(color)
}

/// Parses colors separated by ';' or newlines, skipping blanks and '#' comments.
fn parse_colors(text: &str) -> Result<Vec<Vec<i32>>> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(|line| line.split(';'))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_color)
        .collect()
}

fn spinner(message: String) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn train_colors(args: TrainArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(&args)?;
    let som_config = &config.som;

    let mut raw_colors = Vec::new();
    if let Some(colors) = &args.colors {
        raw_colors.extend(parse_colors(colors)?);
    }
    if let Some(path) = &args.colors_file {
        raw_colors.extend(parse_colors(&fs::read_to_string(path)?)?);
    }

    let custom = args.colors.is_some() || args.colors_file.is_some();

    println!("Prism Color Clustering");
    let (mut som, inputs): (Som, TrainingSet) = if custom {
        println!("   Input space: {} custom colors", raw_colors.len());
        initialize_from_vectors(som_config, &raw_colors)?
    } else {
        println!("   Input space: {} random colors", som_config.sample_count);
        initialize_random(som_config, som_config.sample_count)?
    };
    println!(
        "   Grid: {}x{} ({} neurons), sigma={}, learning rate={}, epochs={}",
        som_config.grid_size,
        som_config.grid_size,
        som.total_neurons(),
        som_config.sigma,
        som_config.learning_rate,
        som_config.max_epochs
    );
    println!();

    if let Some(path) = &args.before {
        save_png(&som, config.render.scale, path)?;
        println!("✓ Saved initial map to {}", path.display());
    }

    let trainer = SomTrainer::new(som_config)?;
    let runs = args.repeat + 1;
    for run in 1..=runs {
        let pb = spinner(format!("Training run {}/{}...", run, runs));
        let metrics = trainer.train(&mut som, &inputs, som_config.max_epochs)?;
        pb.finish_and_clear();

        let qe = som.quantization_error(&inputs)?;
        println!(
            "✓ Run {}/{}: {} epochs, quantization error {:.5} (first epoch {:.5})",
            run,
            runs,
            metrics.epochs(),
            qe,
            metrics.quantization_errors.first().copied().unwrap_or(0.0)
        );
    }

    if let Some(path) = &args.after {
        save_png(&som, config.render.scale, path)?;
        println!("✓ Saved trained map to {}", path.display());
    }

    if args.print {
        println!();
        for neuron in &som.neurons {
            println!("{} {} {}", neuron.row, neuron.col, to_hex(&neuron.weights));
        }
    }

    println!();
    println!("Training complete in {}", HumanDuration(start_time.elapsed()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors() {
        let colors = parse_colors("255,0,0; 0, 255 ,0\n# blue\n0,0,255 # trailing\n\n").unwrap();
        assert_eq!(colors, vec![vec![255, 0, 0], vec![0, 255, 0], vec![0, 0, 255]]);
    }

    #[test]
    fn test_parse_colors_rejects_malformed() {
        assert!(matches!(parse_colors("255,0"), Err(PrismError::Parse(_))));
        assert!(matches!(parse_colors("red,0,0"), Err(PrismError::Parse(_))));
        assert!(parse_colors("").unwrap().is_empty());
    }
}
