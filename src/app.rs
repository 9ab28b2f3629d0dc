use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DeliveryDashboardApp {
    pub state: AppState,
}

impl DeliveryDashboardApp {
    /// Build the app and open the configured data file, if it exists.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        if config.data_path.exists() {
            state.open(&config.data_path);
        } else {
            log::warn!(
                "{} not found; use File → Open… to pick a dataset",
                config.data_path.display()
            );
        }
        Self { state }
    }
}

impl eframe::App for DeliveryDashboardApp {
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

        // ---- Central panel: stats, charts, rows ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &self.state);
            ui.separator();
            table::delivery_table(ui, &self.state);
        });
    }
}
