use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{CategoricalColumn, NumericColumn};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let columns: Vec<(CategoricalColumn, Vec<String>)> = CategoricalColumn::ALL
        .into_iter()
        .map(|col| {
            let values = session.table().unique_values(col).map(str::to_string).collect();
            (col, values)
        })
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Statistic column selector ----
            ui.strong("Statistics for");
            let current = state.stats_column;
            egui::ComboBox::from_id_salt("stats_column")
                .selected_text(current.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for col in NumericColumn::ALL {
                        if ui.selectable_label(current == col, col.name()).clicked() {
                            state.set_stats_column(col);
                        }
                    }
                });
            ui.separator();

            // ---- Per-column filter widgets (collapsible) ----
            for (col, all_values) in &columns {
                let col = *col;
                let selection = state.filters.selection(col).clone();
                let n_selected = all_values.iter().filter(|v| selection.accepts(v)).count();
                let n_total = all_values.len();
                let header_text = format!("{col}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col.name())
                    .default_open(col == CategoricalColumn::Area || col == CategoricalColumn::Vehicle)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(col);
                            }
                        });

                        for val in all_values {
                            let mut checked = selection.accepts(val);
                            let mut text = RichText::new(val.trim());
                            let palette = match col {
                                CategoricalColumn::Area => state.area_colors.as_ref(),
                                CategoricalColumn::Traffic => state.traffic_colors.as_ref(),
                                _ => None,
                            };
                            if let Some(cm) = palette {
                                text = text.color(cm.color_for(val));
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(col, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{}: {} deliveries loaded, {} visible",
                session.source().display(),
                session.table().len(),
                state.visible_rows()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open delivery data")
        .add_filter("Supported files", &["csv", "tsv", "txt", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv", "tsv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
