use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::model::{Concentrations, LineTable, Spectrum, WavelengthGrid};
use crate::error::{Error, Result};

/// Gaussian width of every emission line, in nm.
pub const LINE_SIGMA_NM: f64 = 1.5;

/// Standard deviation of the additive noise, in normalized intensity units.
pub const NOISE_STD: f64 = 0.01;

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// Builds emission spectra as a sum of Gaussian peaks, one per line of every
/// element present in the sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synthesizer {
    sigma: f64,
    noise_std: f64,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self {
            sigma: LINE_SIGMA_NM,
            noise_std: NOISE_STD,
        }
    }
}

impl Synthesizer {
    /// Rejects a non-positive or non-finite line width, and any noise level
    /// `Normal` refuses (negative, NaN, infinite).
    pub fn new(sigma: f64, noise_std: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::InvalidWidth(sigma));
        }
        if !noise_std.is_finite() {
            return Err(Error::Noise(format!("noise level {noise_std} is not finite")));
        }
        Normal::new(0.0, noise_std)?;
        Ok(Self { sigma, noise_std })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn noise_std(&self) -> f64 {
        self.noise_std
    }

    /// Raw, un-normalized sum of peaks. Fails on concentration keys that are
    /// not in `table`, whatever their value.
    pub fn accumulate(
        &self,
        table: &LineTable,
        concentrations: &Concentrations,
        grid: &WavelengthGrid,
    ) -> Result<Vec<f64>> {
        let mut samples = vec![0.0; grid.len()];
        let two_sigma_sq = 2.0 * self.sigma * self.sigma;

        for (id, c) in concentrations.iter() {
            let element = table.lookup(id)?;
            if c <= 0.0 {
                continue;
            }
            for &line in &element.lines {
                for (sample, &x) in samples.iter_mut().zip(grid.points()) {
                    *sample += c * (-(x - line).powi(2) / two_sigma_sq).exp();
                }
            }
        }

        Ok(samples)
    }

    /// Full synthesis: peaks, additive Gaussian noise drawn from `rng`, then
    /// normalization.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        table: &LineTable,
        concentrations: &Concentrations,
        grid: &WavelengthGrid,
        rng: &mut R,
    ) -> Result<Spectrum> {
        let mut samples = self.accumulate(table, concentrations, grid)?;

        if self.noise_std != 0.0 {
            let noise = Normal::new(0.0, self.noise_std)?;
            for sample in samples.iter_mut() {
                *sample += noise.sample(rng);
            }
        }

        Ok(normalize(samples))
    }

    /// Synthesis without the noise step.
    pub fn synthesize_noiseless(
        &self,
        table: &LineTable,
        concentrations: &Concentrations,
        grid: &WavelengthGrid,
    ) -> Result<Spectrum> {
        Ok(normalize(self.accumulate(table, concentrations, grid)?))
    }
}

/// Scale so the largest sample is 1.0 (skipped when the maximum is not
/// positive), then clamp into `[0, 1]`.
pub fn normalize(mut samples: Vec<f64>) -> Spectrum {
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        samples.iter_mut().for_each(|v| *v /= max);
    }
    samples.iter_mut().for_each(|v| *v = v.clamp(0.0, 1.0));
    Spectrum {
        intensities: samples,
    }
}
