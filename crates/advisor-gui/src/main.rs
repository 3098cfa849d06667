//! GUI entry point for Crop Advisor
//!
//! Usage: `crop-advisor-gui [ARTIFACT_ROOT]`. The artifacts are loaded before
//! the window opens; a load failure exits with status 1.

mod advisory_panel;
mod app;

use std::path::PathBuf;

use advisor_app::config::Config;
use advisor_app::logging::{init_logging, LogConfig};
use advisor_app::models::open_advisor;
use app::AdvisorApp;
use eframe::egui;
use tracing::{error, warn};

fn main() -> eframe::Result<()> {
    let (mut config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    if let Err(e) = init_logging(&LogConfig::from_config(&config, false)) {
        eprintln!("Warning: {}", e);
    }
    if let Some(e) = load_error {
        warn!(error = %e, "using default configuration");
    }

    if let Some(root) = std::env::args_os().nth(1) {
        config.artifact_root = Some(PathBuf::from(root));
    }

    let advisor = match open_advisor(&config) {
        Ok(advisor) => advisor,
        Err(e) => {
            error!(error = %e, root = %config.artifact_root().display(), "failed to load artifacts");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 720.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Crop Advisor",
        options,
        Box::new(|cc| Ok(Box::new(AdvisorApp::new(cc, config, advisor)))),
    )
}
