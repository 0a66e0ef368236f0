use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::model::WavelengthGrid;
use crate::data::synth::{Synthesizer, LINE_SIGMA_NM, NOISE_STD};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Parser)]
#[command(
    name = "spectrum-ml",
    version,
    about = "Emission spectrum simulator with classifier-driven element detection"
)]
pub struct Cli {
    /// Trained classifier exported as JSON. Without it the line-match
    /// fallback is used.
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// JSON array of element ids, in the classifier's output order.
    #[arg(long, value_name = "PATH")]
    pub labels: Option<PathBuf>,

    /// JSON line table replacing the built-in one.
    #[arg(long, value_name = "PATH")]
    pub lines: Option<PathBuf>,

    /// Seed for the noise generator; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 350.0, value_name = "NM")]
    pub grid_start: f64,

    #[arg(long, default_value_t = 800.0, value_name = "NM")]
    pub grid_end: f64,

    #[arg(long, default_value_t = 1000)]
    pub samples: usize,

    /// Gaussian width of every line.
    #[arg(long, default_value_t = LINE_SIGMA_NM, value_name = "NM")]
    pub sigma: f64,

    /// Standard deviation of the additive noise (0 disables it).
    #[arg(long, default_value_t = NOISE_STD)]
    pub noise: f64,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Everything fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub lines_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub grid_start: f64,
    pub grid_end: f64,
    pub samples: usize,
    pub sigma: f64,
    pub noise_std: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            labels_path: None,
            lines_path: None,
            seed: None,
            grid_start: 350.0,
            grid_end: 800.0,
            samples: 1000,
            sigma: LINE_SIGMA_NM,
            noise_std: NOISE_STD,
        }
    }
}

impl From<Cli> for SimulatorConfig {
    fn from(cli: Cli) -> Self {
        Self {
            model_path: cli.model,
            labels_path: cli.labels,
            lines_path: cli.lines,
            seed: cli.seed,
            grid_start: cli.grid_start,
            grid_end: cli.grid_end,
            samples: cli.samples,
            sigma: cli.sigma,
            noise_std: cli.noise,
        }
    }
}

impl SimulatorConfig {
    pub fn grid(&self) -> Result<WavelengthGrid> {
        WavelengthGrid::new(self.grid_start, self.grid_end, self.samples)
    }

    pub fn synthesizer(&self) -> Result<Synthesizer> {
        Synthesizer::new(self.sigma, self.noise_std)
    }

    /// Noise generator: seeded when a seed is configured.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
