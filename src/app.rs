use eframe::egui::{self, ScrollArea};

use crate::config::AppConfig;
use crate::data::snapshot::Kpi;
use crate::state::{AppState, View};
use crate::ui::{panels, plot, table_view};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(ctx: &egui::Context, config: AppConfig) -> Self {
        ctx.set_visuals(config.theme.visuals());
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_upload();
        if self.state.upload.is_some() {
            // Keep polling while the upload runs in the background.
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }

        // ---- Top panel: actions + status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: dashboard or table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &self.state;
            let theme = &state.config.theme;
            match (state.view, &state.loaded) {
                (View::Table, Some(loaded)) => {
                    table_view::data_table(ui, &loaded.table, theme);
                }
                _ => {
                    ScrollArea::vertical().show(ui, |ui| {
                        panels::header(ui, theme);
                        panels::kpi_row(ui, &Kpi::cards(state.snapshot()), theme);
                        ui.add_space(16.0);
                        plot::chart_row(ui, state.snapshot(), theme, state.config.histogram_bins);
                    });
                }
            }
        });
    }
}
