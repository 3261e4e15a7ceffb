mod app;
mod color;
mod state;
mod ui;

use app::Co2ExplorerApp;
use clap::Parser;
use co2_explorer::cli::Args;
use co2_explorer::settings::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    let args = Args::parse();
    env_logger::init();

    let settings = Settings::resolve(&args);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Análise de Emissões de CO2",
        options,
        Box::new(|_cc| Ok(Box::new(Co2ExplorerApp::new(settings)))),
    )
}
