use eframe::egui::{self, RichText, Stroke, Ui};

use crate::config::Theme;
use crate::data::snapshot::Kpi;
use crate::state::{AppState, View};

const SUBTITLE: &str =
    "Overview of Type mix, Flowrate distribution, and Pressure–Temperature relationships.";

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    let theme = state.config.theme.clone();
    egui::menu::bar(ui, |ui: &mut Ui| {
        if action_button(ui, "Upload CSV", &theme).clicked() {
            open_file_dialog(state);
        }

        let loaded = state.loaded.is_some();
        match state.view {
            View::Dashboard => {
                if ui
                    .add_enabled(loaded, action("View Table", &theme))
                    .clicked()
                {
                    state.show_table();
                }
            }
            View::Table => {
                if action_button(ui, "Back to Dashboard", &theme).clicked() {
                    state.show_dashboard();
                }
            }
        }

        if ui
            .add_enabled(loaded, action("Export…", &theme))
            .clicked()
        {
            export(state);
        }

        ui.separator();

        if let Some(l) = &state.loaded {
            let name = l
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{name}: {} rows, {} columns",
                l.table.row_count(),
                l.table.columns().len()
            ));
        }
        if state.upload.is_some() {
            ui.spinner();
            ui.label("Uploading…");
        }

        if let Some(msg) = &state.status_message {
            let color = if state.status_is_error {
                egui::Color32::LIGHT_RED
            } else {
                theme.header
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

fn action(label: &str, theme: &Theme) -> egui::Button<'static> {
    egui::Button::new(RichText::new(label.to_string()).size(16.0).color(theme.button_text))
        .fill(theme.button_bg)
        .stroke(Stroke::new(2.0, theme.border))
}

fn action_button(ui: &mut Ui, label: &str, theme: &Theme) -> egui::Response {
    ui.add(action(label, theme))
}

// ---------------------------------------------------------------------------
// Dashboard header + KPI cards
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui, theme: &Theme) {
    ui.label(
        RichText::new("Chemical Equipment Dashboard")
            .size(36.0)
            .strong()
            .color(theme.header),
    );
    ui.label(RichText::new(SUBTITLE).size(16.0).color(theme.text));
    ui.add_space(8.0);
}

/// Four KPI cards in a row.
pub fn kpi_row(ui: &mut Ui, cards: &[Kpi; 4], theme: &Theme) {
    ui.horizontal(|ui: &mut Ui| {
        for (card, fill) in cards.iter().zip(theme.kpi_fills) {
            kpi_card(ui, card, fill, theme);
        }
    });
}

fn kpi_card(ui: &mut Ui, card: &Kpi, fill: egui::Color32, theme: &Theme) {
    egui::Frame::group(ui.style())
        .fill(fill)
        .stroke(Stroke::new(2.5, theme.border))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(180.0);
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(card.title).size(14.0).color(theme.text));
                ui.label(RichText::new(&card.value).size(26.0).strong().color(theme.text));
                ui.label(RichText::new(&card.hint).size(12.0).color(theme.text));
            });
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Select CSV file")
        .add_filter("CSV files", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

fn export(state: &mut AppState) {
    let Some(snapshot) = state.snapshot() else {
        return;
    };
    let (theme, bins) = (&state.config.theme, state.config.histogram_bins);
    match crate::export::save_dialog(snapshot, theme, bins) {
        Ok(Some(path)) => state.set_status(Some(format!("Exported to {}", path.display())), false),
        Ok(None) => {}
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.set_status(Some(format!("Export failed: {e:#}")), true);
        }
    }
}
