use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Selection;
use crate::state::AppState;

const GOLD: Color32 = Color32::from_rgb(255, 215, 0);

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("ELITE 100").color(GOLD).heading().strong());
        ui.label(RichText::new("visualizer").italics().color(Color32::GRAY));
    });
    ui.separator();

    // Clone what we need so we can mutate state inside the loops.
    let brands = state.table.brands.clone();
    let drivetrains = state.table.drivetrains.clone();
    let engine_types = state.table.engine_types.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            summary(ui, state);
            ui.separator();

            ui.heading("Filters");

            if let Some(value) = multi_select(ui, "Brand", &brands, &state.filter.brands) {
                match value {
                    Some(brand) => state.toggle_brand(&brand),
                    None => state.all_brands(),
                }
            }

            if let Some(value) =
                multi_select(ui, "Drivetrain", &drivetrains, &state.filter.drivetrains)
            {
                match value {
                    Some(drivetrain) => state.toggle_drivetrain(&drivetrain),
                    None => state.all_drivetrains(),
                }
            }

            // ---- Engine type: single choice ----
            ui.strong("Engine Type");
            let current = state.filter.engine_type.clone();
            let mut chosen = current.clone();
            egui::ComboBox::from_id_salt("engine_type")
                .selected_text(current.as_deref().unwrap_or("All"))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut chosen, None, "All");
                    for engine in &engine_types {
                        ui.selectable_value(&mut chosen, Some(engine.clone()), engine);
                    }
                });
            if chosen != current {
                state.set_engine_type(chosen);
            }
            ui.add_space(6.0);

            // ---- Model / chassis search ----
            ui.strong("Model, Chassis");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.search_text)
                    .hint_text("e.g., Civic Type R, 992.1"),
            );
            if response.changed() {
                state.apply_search();
            }
            ui.label(RichText::new("Comma-separated, word match").small().weak());
        });
}

/// Collapsible "All + checkboxes" list.
///
/// Returns `Some(Some(value))` when a value was toggled and `Some(None)`
/// when "All" was clicked.
fn multi_select(
    ui: &mut Ui,
    title: &str,
    values: &BTreeSet<String>,
    selection: &Selection,
) -> Option<Option<String>> {
    let mut action = None;
    let header = match selection {
        Selection::All => format!("{title}  (all)"),
        Selection::Only(set) => format!("{title}  ({}/{})", set.len(), values.len()),
    };

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let mut all = selection.is_all();
            if ui.checkbox(&mut all, "All").clicked() && !selection.is_all() {
                action = Some(None);
            }
            for value in values {
                let mut checked = selection.is_selected(value);
                if ui.checkbox(&mut checked, value).changed() {
                    action = Some(Some(value.clone()));
                }
            }
        });

    action
}

/// Vehicle counts and the fastest lap of the current selection.
fn summary(ui: &mut Ui, state: &AppState) {
    let summary = &state.chart.summary;
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(summary.headline()).strong());
    });

    let Some(fastest) = &summary.fastest else {
        return;
    };

    egui::Frame::group(ui.style())
        .fill(Color32::BLACK)
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label("⚡ Fastest Laptime");
                ui.label(RichText::new(&fastest.name).size(18.0).strong());
                ui.label(&fastest.duration);
                ui.label(&fastest.vehicle);
                ui.label(&fastest.engine);
                ui.label(&fastest.event);
                ui.label(&fastest.rank);
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(format!(
            "{} vehicles loaded, {} visible",
            state.table.len(),
            state.visible_indices.len()
        ));

        ui.separator();

        if ui
            .selectable_label(state.show_table, "Vehicle Table")
            .clicked()
        {
            state.show_table = !state.show_table;
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::YELLOW));
        }
    });
}
