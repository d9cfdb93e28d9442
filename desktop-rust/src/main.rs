mod app;
mod logging;

use app::{configure_fonts, DesktopApp};
use tracing::info;

fn main() -> eframe::Result<()> {
    if let Err(err) = logging::init() {
        eprintln!("Logging init failed: {err}");
    }
    info!("Kensa Sheet started");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([800.0, 450.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Kensa Sheet",
        options,
        Box::new(|cc| {
            configure_fonts(&cc.egui_ctx);
            Box::new(DesktopApp::default())
        }),
    )
}
