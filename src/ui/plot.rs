use eframe::egui::{Align2, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::state::AppState;

/// Top of the highlighted bands, just above the normalized maximum.
const BAND_TOP: f64 = 1.05;

// ---------------------------------------------------------------------------
// Spectral plot (central panel)
// ---------------------------------------------------------------------------

/// Render the analysed spectrum with the detected regions behind it.
pub fn spectral_plot(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No spectrum to show");
        });
        return;
    };

    Plot::new("spectral_plot")
        .legend(Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Normalized intensity")
        .include_x(state.grid.start())
        .include_x(state.grid.end())
        .include_y(0.0)
        .include_y(BAND_TOP)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // Bands first so the trace is drawn on top.
            for band in &analysis.bands {
                let (lo, hi) = (band.lower(), band.upper());
                let outline = vec![[lo, 0.0], [hi, 0.0], [hi, BAND_TOP], [lo, BAND_TOP]];
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(outline))
                        .fill_color(state.colors.band_fill(&band.element))
                        .stroke(Stroke::NONE),
                );

                if band.show_label {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(lo, BAND_TOP),
                            RichText::new(&band.element).color(state.colors.color_for(&band.element)),
                        )
                        .anchor(Align2::LEFT_BOTTOM),
                    );
                }
            }

            let points: PlotPoints = state
                .grid
                .points()
                .iter()
                .zip(&analysis.spectrum.intensities)
                .map(|(&x, &y)| [x, y])
                .collect();

            plot_ui.line(Line::new(points).name("Analysed spectrum").width(2.0));
        });
}

// ---------------------------------------------------------------------------
// Quantitative charts (bottom panel)
// ---------------------------------------------------------------------------

/// Grouped bars: concentration set on the sliders next to the predicted
/// probability, per element.
pub fn comparison_chart(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        return;
    };
    let reports = analysis.reports();
    let names: Vec<String> = reports.iter().map(|r| r.element.clone()).collect();

    let real: Vec<Bar> = reports
        .iter()
        .enumerate()
        .map(|(i, r)| Bar::new(i as f64 - 0.2, r.real).name(&r.element))
        .collect();
    let predicted: Vec<Bar> = reports
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64 + 0.2, r.predicted)
                .name(&r.element)
                .fill(state.colors.color_for(&r.element))
        })
        .collect();

    Plot::new("comparison_chart")
        .legend(Legend::default())
        .y_axis_label("Value")
        .include_y(0.0)
        .include_y(1.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(move |mark, _range| element_tick(&names, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(real).name("Real").width(0.35));
            plot_ui.bar_chart(BarChart::new(predicted).name("Predicted").width(0.35));
        });
}

/// Estimated composition: each element's share of the summed probabilities.
pub fn composition_chart(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        return;
    };
    let reports = analysis.reports();
    let names: Vec<String> = reports.iter().map(|r| r.element.clone()).collect();

    let bars: Vec<Bar> = reports
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.share)
                .name(format!("{} {:.1}%", r.element, r.share * 100.0))
                .fill(state.colors.color_for(&r.element))
        })
        .collect();

    Plot::new("composition_chart")
        .include_x(0.0)
        .include_x(1.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .y_axis_formatter(move |mark, _range| element_tick(&names, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.6));
        });
}

/// Axis label for integer positions, blank elsewhere.
fn element_tick(names: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    names.get(rounded as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_on_element_positions() {
        let names = vec!["Hidrogeno".to_string(), "Sodio".to_string()];
        assert_eq!(element_tick(&names, 1.0), "Sodio");
        assert_eq!(element_tick(&names, 0.5), "");
        assert_eq!(element_tick(&names, -1.0), "");
        assert_eq!(element_tick(&names, 7.0), "");
    }
}
