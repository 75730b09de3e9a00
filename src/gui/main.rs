// GUI entry point for product-image-exporter
// Select images, convert them to WebP and generate the .unl/.csv/.sql exports

use eframe::egui;

mod app;
use app::ImageExporterApp;

fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 420.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Image Converter and Export Generator",
        options,
        Box::new(|cc| Ok(Box::new(ImageExporterApp::new(cc)))),
    )
}
