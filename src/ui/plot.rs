use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoints, Points};

use crate::color::category_colors;
use crate::config::Theme;
use crate::data::charts::Histogram;
use crate::data::snapshot::{DashboardState, FLOWRATE_COLUMN, PRESSURE_COLUMN, TEMPERATURE_COLUMN};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the three dashboard charts side by side.
/// Before the first load the plots are drawn empty.
pub fn chart_row(ui: &mut Ui, snapshot: Option<&DashboardState>, theme: &Theme, bins: usize) {
    ui.columns(3, |cols: &mut [Ui]| {
        type_mix(&mut cols[0], snapshot, theme);
        flowrate_distribution(&mut cols[1], snapshot, theme, bins);
        pressure_vs_temperature(&mut cols[2], snapshot, theme);
    });
}

fn chart_title(ui: &mut Ui, title: &str, theme: &Theme) {
    ui.label(RichText::new(title).size(16.0).color(theme.header));
}

fn type_mix(ui: &mut Ui, snapshot: Option<&DashboardState>, theme: &Theme) {
    chart_title(ui, "Equipment Type Mix", theme);

    let (bars, labels): (Vec<Bar>, Vec<String>) = match snapshot {
        Some(s) => s
            .type_counts
            .iter()
            .zip(category_colors(&s.type_counts, theme.border))
            .enumerate()
            .map(|(i, ((label, n), (_, color)))| {
                let bar = Bar::new(i as f64, n as f64)
                    .name(label)
                    .width(0.7)
                    .fill(color);
                (bar, label.to_string())
            })
            .unzip(),
        None => (Vec::new(), Vec::new()),
    };

    Plot::new("type_mix")
        .height(CHART_HEIGHT)
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            // Only label whole positions that carry a bar.
            let pos = mark.value;
            if pos.fract().abs() > f64::EPSILON || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(theme.border));
        });
}

fn flowrate_distribution(ui: &mut Ui, snapshot: Option<&DashboardState>, theme: &Theme, bins: usize) {
    chart_title(ui, "Flowrate Distribution", theme);

    let histogram = snapshot.and_then(|s| Histogram::from_values(&s.flowrate_series, bins));
    let bars: Vec<Bar> = histogram
        .as_ref()
        .map(|h| {
            h.counts
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    Bar::new(h.center(i), n as f64)
                        .width(h.bin_width())
                        .fill(theme.kpi_fills[1])
                })
                .collect()
        })
        .unwrap_or_default();

    Plot::new("flowrate_distribution")
        .height(CHART_HEIGHT)
        .x_axis_label(FLOWRATE_COLUMN)
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(theme.axis_text).name(FLOWRATE_COLUMN));
        });
}

fn pressure_vs_temperature(ui: &mut Ui, snapshot: Option<&DashboardState>, theme: &Theme) {
    chart_title(ui, "Pressure vs Temperature", theme);

    let points: PlotPoints = snapshot
        .map(|s| s.pressure_temperature.points().collect())
        .unwrap_or_else(|| PlotPoints::new(Vec::new()));

    Plot::new("pressure_vs_temperature")
        .height(CHART_HEIGHT)
        .x_axis_label(PRESSURE_COLUMN)
        .y_axis_label(TEMPERATURE_COLUMN)
        .allow_boxed_zoom(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(4.0)
                    .color(theme.kpi_fills[2])
                    .name("Pressure vs Temperature"),
            );
        });
}
