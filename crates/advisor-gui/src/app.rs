//! Main application structure

use advisor_app::config::Config;
use advisor_domain::service::AdvisoryContext;
use eframe::egui;

use crate::advisory_panel::AdvisoryPanel;

/// Main application state
pub struct AdvisorApp {
    /// Loaded models, read-only for the life of the window
    advisor: AdvisoryContext,
    /// Form and result state
    panel: AdvisoryPanel,
}

impl AdvisorApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, advisor: AdvisoryContext) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.interaction.tooltip_delay = 0.5;
        style.animation_time = 0.1;
        cc.egui_ctx.set_style(style);

        let panel = AdvisoryPanel::new(&advisor, &config);
        Self { advisor, panel }
    }
}

impl eframe::App for AdvisorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.panel.ui(ui, &self.advisor);
            });
        });
    }
}
