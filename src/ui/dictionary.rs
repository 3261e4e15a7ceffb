use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use co2_explorer::data::model::Column;

// ---------------------------------------------------------------------------
// Data dictionary table
// ---------------------------------------------------------------------------

/// Render the canonical columns with their descriptions.
pub fn data_dictionary(ui: &mut Ui) {
    ui.heading("Dicionário de Dados");
    ui.label("Descrição das colunas presentes no dataset:");

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(TableColumn::auto().at_least(180.0))
        .column(TableColumn::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Coluna");
            });
            header.col(|ui| {
                ui.strong("Descrição");
            });
        })
        .body(|mut body| {
            for column in Column::ALL {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.monospace(column.name());
                    });
                    row.col(|ui| {
                        ui.label(column.description());
                    });
                });
            }
        });
}
