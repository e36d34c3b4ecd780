use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::laptime::format_lap_time;
use crate::state::AppState;

const HEADERS: [&str; 9] = [
    "Rank",
    "Name",
    "Year",
    "Brand",
    "Model",
    "Chassis",
    "Engine",
    "Drivetrain",
    "Time",
];

/// Vehicles passing the current filter, in table order.
pub fn vehicle_table(ui: &mut Ui, state: &AppState) {
    let rows = &state.visible_indices;
    let fastest = state.chart.summary.fastest.as_ref().map(|f| f.record);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(40.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let idx = rows[row.index()];
                let rec = &state.table.records[idx];
                row.set_selected(Some(idx) == fastest);
                row.col(|ui| {
                    ui.label(rec.rank.as_str());
                });
                row.col(|ui| {
                    let name = ui.label(rec.name.as_str());
                    if let Some(details) = rec.extra_details() {
                        name.on_hover_text(details);
                    }
                });
                let cells = [
                    rec.year.clone(),
                    rec.brand.clone(),
                    rec.model.clone(),
                    rec.chassis_code.clone(),
                    match rec.engine_litres {
                        Some(litres) => format!("{litres:.1}L {}", rec.engine_type),
                        None => format!("{} {}", rec.engine_l, rec.engine_type),
                    },
                    rec.drivetrain.clone(),
                ];
                for text in cells {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
                row.col(|ui| {
                    ui.label(RichText::new(format_lap_time(rec.lap_time)).monospace())
                        .on_hover_text(format!("as entered: {}", rec.time_raw));
                });
            });
        });
}
