use eframe::egui::{self, Color32, ProgressBar, RichText, ScrollArea, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use spectrum_ml::data::detect::is_detected;
use spectrum_ml::data::export::export_file;

use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Left side panel – sample composition
// ---------------------------------------------------------------------------

/// One concentration slider per element.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sample configuration");
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let labels: Vec<String> = state.assets.labels().map(str::to_string).collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for id in &labels {
                let mut value = state.concentrations.get(id);
                ui.label(RichText::new(format!("Concentración de {id}")).strong());
                if ui.add(Slider::new(&mut value, 0.0..=1.0)).changed() {
                    state.set_concentration(id, value);
                }
                ui.add_space(4.0);
            }

            ui.separator();
            if ui.button("Reset").clicked() {
                state.reset();
            }
        });
}

// ---------------------------------------------------------------------------
// Right side panel – per-element confidence
// ---------------------------------------------------------------------------

pub fn confidence_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Classifier analysis");
    ui.separator();

    let Some(analysis) = &state.analysis else {
        ui.label("No prediction available.");
        return;
    };

    for (id, &p) in analysis.elements.iter().zip(&analysis.predictions) {
        let fill = if is_detected(p) {
            Color32::DARK_GREEN
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(id).strong().color(state.colors.color_for(id)));
        ui.add(ProgressBar::new(p as f32).fill(fill));
        ui.small(format!("Confianza: {:.2}%", p * 100.0));
        ui.add_space(6.0);
    }
}

// ---------------------------------------------------------------------------
// Bottom panel – quantitative analysis
// ---------------------------------------------------------------------------

pub fn quantitative_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Quantitative analysis");
    ui.separator();

    ui.columns(3, |cols| {
        cols[0].strong("Estimated composition");
        plot::composition_chart(&mut cols[0], state);

        cols[1].strong("Real vs predicted");
        plot::comparison_chart(&mut cols[1], state);

        cols[2].strong("Summary");
        report_table(&mut cols[2], state);
    });
}

fn report_table(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        return;
    };
    let reports = analysis.reports();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .columns(Column::remainder(), 3)
        .header(20.0, |mut header| {
            for title in ["Element", "Real", "Predicted", "Share"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for r in &reports {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let mut text = RichText::new(&r.element);
                        if r.detected {
                            text = text.strong();
                        }
                        ui.label(text);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", r.real));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}%", r.predicted * 100.0));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}%", r.share * 100.0));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export spectrum…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "Classifier: {}  ·  {} elements  ·  {:.0}–{:.0} nm",
            state.assets.classifier.name(),
            state.assets.elements.len(),
            state.grid.start(),
            state.grid.end()
        ));

        if let Some(analysis) = &state.analysis {
            ui.separator();
            let detected: Vec<&str> = analysis.detected().collect();
            if detected.is_empty() {
                ui.label("Nothing detected");
            } else {
                ui.label(format!("Detected: {}", detected.join(", ")));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let Some(analysis) = &state.analysis else {
        state.status_message = Some("Nothing to export".to_string());
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export spectrum")
        .set_file_name("espectro.csv")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = export_file(&path, &state.grid, analysis) {
            log::error!("Failed to export spectrum: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
