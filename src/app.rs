use eframe::egui;

use crate::data::model::VehicleTable;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EliteVisualizerApp {
    pub state: AppState,
}

impl EliteVisualizerApp {
    pub fn new(table: VehicleTable) -> Self {
        Self {
            state: AppState::new(table),
        }
    }
}

impl eframe::App for EliteVisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: counts and view toggles ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and fastest lap ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: vehicle table ----
        if self.state.show_table {
            egui::TopBottomPanel::bottom("vehicle_table")
                .resizable(true)
                .default_height(240.0)
                .show(ctx, |ui| {
                    table::vehicle_table(ui, &self.state);
                });
        }

        // ---- Central panel: lap-time plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::lap_time_plot(ui, &self.state);
        });
    }
}
