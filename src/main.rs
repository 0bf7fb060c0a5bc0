mod app;
mod color;
mod config;
mod data;
mod export;
mod report;
mod state;
mod ui;
mod upload;

use app::DashboardApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    match &config.upload_endpoint {
        Some(url) => log::info!("Uploading loaded datasets to {url}"),
        None => log::info!("Dataset upload disabled"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chemical Equipment Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(&cc.egui_ctx, config)))),
    )
}
