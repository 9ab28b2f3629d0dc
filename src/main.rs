use delivery_dashboard::app::DeliveryDashboardApp;
use delivery_dashboard::config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    let config = match DashboardConfig::resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration, using defaults: {e:#}");
            DashboardConfig::default()
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Delivery Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DeliveryDashboardApp::new(&config)))),
    )
}
