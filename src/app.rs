use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpectrumApp {
    pub state: AppState,
}

impl SpectrumApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SpectrumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: concentrations ----
        egui::SidePanel::left("concentration_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: per-element confidence ----
        egui::SidePanel::right("confidence_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::confidence_panel(ui, &self.state);
            });

        // ---- Bottom panel: quantitative analysis ----
        egui::TopBottomPanel::bottom("quantitative_panel")
            .default_height(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::quantitative_panel(ui, &self.state);
            });

        // ---- Central panel: spectrum ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectral_plot(ui, &self.state);
        });
    }
}
