use rand::rngs::StdRng;

use spectrum_ml::analysis::{analyze, Analysis};
use spectrum_ml::assets::Assets;
use spectrum_ml::data::model::{Concentrations, WavelengthGrid};
use spectrum_ml::data::synth::Synthesizer;

use crate::color::ElementColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub assets: Assets,
    pub grid: WavelengthGrid,
    pub synthesizer: Synthesizer,

    /// Noise source, seeded when `--seed` was given.
    rng: StdRng,

    /// Current slider values, one per label.
    pub concentrations: Concentrations,

    /// Result of the last successful interaction.
    pub analysis: Option<Analysis>,

    pub colors: ElementColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(assets: Assets, grid: WavelengthGrid, synthesizer: Synthesizer, rng: StdRng) -> Self {
        let labels: Vec<&str> = assets.labels().collect();
        let concentrations = Concentrations::zeros(&labels);
        let colors = ElementColors::new(&labels);

        let mut state = Self {
            assets,
            grid,
            synthesizer,
            rng,
            concentrations,
            analysis: None,
            colors,
            status_message: None,
        };
        state.recompute();
        state
    }

    /// Run one full synthesize → predict → overlay pass.
    pub fn recompute(&mut self) {
        match analyze(
            &self.assets,
            &self.synthesizer,
            &self.grid,
            &self.concentrations,
            &mut self.rng,
        ) {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Analysis failed: {e}");
                self.analysis = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_concentration(&mut self, id: &str, value: f64) {
        self.concentrations.set(id, value);
        self.recompute();
    }

    /// All sliders back to zero.
    pub fn reset(&mut self) {
        self.concentrations.reset();
        self.recompute();
    }
}
