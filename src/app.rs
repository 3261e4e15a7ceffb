use co2_explorer::settings::Settings;
use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, dictionary, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct Co2ExplorerApp {
    pub state: AppState,
}

impl Co2ExplorerApp {
    /// Build the app and load the configured dataset.
    pub fn new(settings: Settings) -> Self {
        let path = settings.dataset_path.clone();
        let mut state = AppState::new(settings);
        state.open(&path);
        Self { state }
    }
}

impl eframe::App for Co2ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dictionary, metrics, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Dashboard Simples: Análise de Emissões de CO2");
                    ui.label("Uma visão geral das distribuições das variáveis do dataset.");
                    ui.add_space(8.0);

                    dictionary::data_dictionary(ui);
                    ui.add_space(12.0);

                    if self.state.dataset.is_none() {
                        ui.label("No dataset loaded (File → Open…).");
                        return;
                    }
                    charts::metrics(ui, &self.state);
                    ui.add_space(12.0);
                    charts::histogram_section(ui, &mut self.state);
                    ui.add_space(12.0);
                    charts::pie_section(ui, &mut self.state);
                    ui.add_space(12.0);

                    ui.label(
                        "Fim do dashboard. Este é um layout simplificado focado na exploração de distribuições.",
                    );
                });
        });
    }
}
