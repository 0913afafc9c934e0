//! pdf2clip
//!
//! Copies a single PDF page to the system clipboard as an image.

mod app;
mod clipboard;
mod config;
mod state;

use app::Pdf2ClipApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_resizable(false)
            .with_title(config.window_title.clone()),
        ..Default::default()
    };

    log::info!("starting {} {}", config.window_title, env!("CARGO_PKG_VERSION"));

    let app_name = config.window_title.clone();
    eframe::run_native(
        &app_name,
        options,
        Box::new(|cc| Ok(Box::new(Pdf2ClipApp::new(cc, config)))),
    )
}
