mod app;
mod engine;
mod types;

use app::HeicConverterApp;

fn main() -> Result<(), eframe::Error> {
    // Respect RUST_LOG if set; conversion failures land here at warn
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "heic_converter_gui=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 280.0])
            .with_min_inner_size([360.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HEIC to JPG Converter",
        options,
        Box::new(|_cc| Ok(Box::new(HeicConverterApp::new()))),
    )
}
