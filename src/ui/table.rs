use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Record;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

const HEADERS: [&str; 10] = [
    "Order_ID",
    "Area",
    "Vehicle",
    "Traffic",
    "Weather",
    "Category",
    "Delivery_Time",
    "Agent_Age",
    "Agent_Rating",
    "Order_Date",
];

fn cells(record: &Record) -> [String; 10] {
    [
        record.order_id.clone(),
        record.area.clone(),
        record.vehicle.clone(),
        record.traffic.clone(),
        record.weather.clone(),
        record.category.clone(),
        format!("{}", record.delivery_time),
        record.agent_age.to_string(),
        format!("{:.1}", record.agent_rating),
        record.order_date.clone().unwrap_or_default(),
    ]
}

// ---------------------------------------------------------------------------
// Filtered rows
// ---------------------------------------------------------------------------

/// Render the filtered deliveries, capped at the configured preview size.
pub fn delivery_table(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        return;
    };
    let records = view.rows.records();
    let shown = records.len().min(state.preview_rows);

    ui.strong(format!("Delivery data ({} rows)", records.len()));
    if shown < records.len() {
        ui.label(RichText::new(format!("showing the first {shown}")).weak());
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), HEADERS.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, shown, |mut row| {
                let record = &records[row.index()];
                for text in cells(record) {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
