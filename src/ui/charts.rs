use std::f64::consts::TAU;

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Polygon};

use co2_explorer::data::model::Column;

use crate::state::AppState;

/// Slices beyond this are merged into one "outros" slice.
const MAX_PIE_SLICES: usize = 12;

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

pub fn metrics(ui: &mut Ui, state: &AppState) {
    let summary = &state.snapshot.summary;
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Veículos", summary.vehicles.to_string());
        metric(ui, "Média CO2 (g/km)", format_mean(summary.mean_co2));
        metric(ui, "Consumo médio (L/100 km)", format_mean(summary.mean_combined));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(label);
            ui.label(RichText::new(value).heading().strong());
        });
    });
}

fn format_mean(mean: Option<f64>) -> String {
    match mean {
        Some(v) => format!("{v:.1}"),
        None => "sem dados".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Numeric-variable selector plus its histogram for the current selection.
pub fn histogram_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Distribuição das Variáveis Numéricas");
    ui.label("Selecione uma variável para visualizar sua distribuição em um histograma.");

    let current = state.histogram_column;
    egui::ComboBox::from_label("Selecione a variável:")
        .selected_text(current.name())
        .show_ui(ui, |ui: &mut Ui| {
            for column in Column::numeric() {
                if ui.selectable_label(current == column, column.name()).clicked() {
                    state.set_histogram_column(column);
                }
            }
        });

    let histogram = &state.snapshot.histogram;
    if histogram.is_empty() {
        ui.label("Nenhum veículo corresponde aos filtros.");
        return;
    }

    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|bin| {
            let width = if bin.width() > 0.0 { bin.width() } else { 1.0 };
            Bar::new(bin.center(), bin.count as f64)
                .width(width * 0.9)
                .name(format!("{:.1} – {:.1}", bin.lower, bin.upper))
        })
        .collect();
    let chart = BarChart::new(bars)
        .color(Color32::LIGHT_BLUE)
        .name(state.histogram_column.name());

    Plot::new("histogram")
        .height(300.0)
        .x_axis_label(state.histogram_column.name())
        .y_axis_label("contagem")
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Categorical-variable selector plus a pie chart of its frequency table.
pub fn pie_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Proporção por Categoria");

    let current = state.pie_column;
    egui::ComboBox::from_label("Selecione a categoria:")
        .selected_text(current.name())
        .show_ui(ui, |ui: &mut Ui| {
            for column in Column::categorical() {
                if ui.selectable_label(current == column, column.name()).clicked() {
                    state.set_pie_column(column);
                }
            }
        });

    let table = &state.snapshot.pie;
    let total = table.total();
    if total == 0 {
        ui.label("Nenhum veículo corresponde aos filtros.");
        return;
    }

    let mut slices: Vec<(String, usize, Color32)> = table
        .entries()
        .iter()
        .take(MAX_PIE_SLICES)
        .map(|(label, count)| {
            let color = state
                .pie_colors
                .as_ref()
                .map(|cm| cm.color_for(label))
                .unwrap_or(Color32::GRAY);
            (label.clone(), *count, color)
        })
        .collect();
    let rest: usize = table.entries().iter().skip(MAX_PIE_SLICES).map(|(_, c)| c).sum();
    if rest > 0 {
        slices.push(("outros".to_string(), rest, Color32::DARK_GRAY));
    }

    Plot::new("pie")
        .height(320.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (label, count, color) in slices {
                let share = count as f64 / total as f64;
                let points = slice_outline(start, share * TAU);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(points))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(format!("{label} ({:.1}%)", share * 100.0)),
                );
                start += share * TAU;
            }
        });
}

/// Outline of a unit-circle wedge from `start` spanning `sweep` radians.
fn slice_outline(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / TAU) * 128.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for s in 0..=steps {
        let angle = start + sweep * s as f64 / steps as f64;
        points.push([angle.cos(), angle.sin()]);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedge_starts_at_centre_and_follows_the_arc() {
        let points = slice_outline(0.0, TAU / 4.0);
        assert_eq!(points[0], [0.0, 0.0]);
        assert_eq!(points[1], [1.0, 0.0]);
        let last = points[points.len() - 1];
        assert!(last[0].abs() < 1e-9 && (last[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_mean_reads_as_no_data() {
        assert_eq!(format_mean(None), "sem dados");
        assert_eq!(format_mean(Some(200.04)), "200.0");
    }
}
