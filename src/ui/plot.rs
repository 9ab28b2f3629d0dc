use eframe::egui::{self, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::ColorMap;
use crate::data::stats::Summary;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel: summary + ranked charts
// ---------------------------------------------------------------------------

/// Render statistics and ranking charts for the current view.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let view = match &state.view {
        Some(view) => view,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view deliveries  (File → Open…)");
            });
            return;
        }
    };

    ui.heading(format!("{} Stats", state.stats_column));
    match &view.summary {
        Ok(summary) => summary_grid(ui, summary),
        Err(_) => {
            ui.label(RichText::new("No data for the current filters.").italics());
        }
    }
    ui.add_space(8.0);

    ui.columns(2, |cols| {
        ranking_chart(
            &mut cols[0],
            "area_ranking",
            "Mean delivery time by Area",
            &view.area_ranking,
            state.area_colors.as_ref(),
        );
        ranking_chart(
            &mut cols[1],
            "traffic_ranking",
            "Mean delivery time by Traffic",
            &view.traffic_ranking,
            state.traffic_colors.as_ref(),
        );
    });
}

fn summary_grid(ui: &mut Ui, summary: &Summary) {
    let std = summary
        .std
        .map_or_else(|| "n/a".to_string(), |s| format!("{s:.2}"));
    let cells = [
        ("count", summary.count.to_string()),
        ("mean", format!("{:.2}", summary.mean)),
        ("std", std),
        ("min", format!("{:.2}", summary.min)),
        ("25%", format!("{:.2}", summary.q25)),
        ("50%", format!("{:.2}", summary.median)),
        ("75%", format!("{:.2}", summary.q75)),
        ("max", format!("{:.2}", summary.max)),
    ];

    egui::Grid::new("summary_grid")
        .striped(true)
        .num_columns(cells.len())
        .show(ui, |ui: &mut Ui| {
            for (label, _) in &cells {
                ui.strong(*label);
            }
            ui.end_row();
            for (_, value) in &cells {
                ui.monospace(value);
            }
            ui.end_row();
        });
}

/// Horizontal bars, fastest group at the bottom of the axis.
fn ranking_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    ranking: &[(String, f64)],
    colors: Option<&ColorMap>,
) {
    ui.strong(title);
    if ranking.is_empty() {
        ui.label(RichText::new("No data.").italics());
        return;
    }

    let bars: Vec<Bar> = ranking
        .iter()
        .enumerate()
        .map(|(i, (key, mean))| {
            let mut bar = Bar::new(i as f64, *mean).name(key.trim()).width(0.7);
            if let Some(cm) = colors {
                bar = bar.fill(cm.color_for(key));
            }
            bar
        })
        .collect();

    Plot::new(id)
        .legend(Legend::default())
        .height(220.0)
        .x_axis_label("Minutes")
        .show_y(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name(title));
        });
}
