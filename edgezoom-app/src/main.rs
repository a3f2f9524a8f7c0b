mod animation;
mod app;
mod app_dir;
mod input;
mod io_worker;
mod preferences;
mod ui;

use eframe::egui;
use tracing::info;

use app::EdgeZoomApp;
use preferences::AppPreferences;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting EdgeZoom");

    let prefs = AppPreferences::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("EdgeZoom")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "EdgeZoom",
        options,
        Box::new(move |cc| Ok(Box::new(EdgeZoomApp::new(&cc.egui_ctx, prefs)?))),
    )
}
