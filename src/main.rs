use eframe::egui;
use std::path::PathBuf;
use vector_pick::app::VectorPickApp;
use vector_pick::config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::load();
    let initial_path = std::env::args().nth(1).map(PathBuf::from);

    let title = "Image Vector Drawer";
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title(title),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        title,
        options,
        Box::new(move |_cc| Ok(Box::new(VectorPickApp::new(config, initial_path)))),
    ) {
        log::error!("failed to run eframe: {e}");
        std::process::exit(1);
    }
}
