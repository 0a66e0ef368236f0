mod app;
mod color;
mod state;
mod ui;

use anyhow::Context;
use app::SpectrumApp;
use clap::Parser;
use eframe::egui;

use spectrum_ml::assets::Assets;
use spectrum_ml::config::{Cli, SimulatorConfig};
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = SimulatorConfig::from(Cli::parse());
    let grid = config.grid().context("building wavelength grid")?;
    let assets = Assets::load(&config, &grid)?;
    let synthesizer = config.synthesizer().context("configuring synthesizer")?;
    let state = AppState::new(assets, grid, synthesizer, config.rng());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spectrum-ML Analyzer",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(SpectrumApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
