//! Advisory form for crop-advisor GUI
//!
//! Farm inputs, the recommendation button, the result table and Excel export.

use advisor_app::app::{advise, AdvisoryReport, BatchResults};
use advisor_app::config::Config;
use advisor_app::export::export_to_excel;
use advisor_domain::model::{FarmObservation, NumericField};
use advisor_domain::service::AdvisoryContext;
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use std::path::Path;
use tracing::{info, warn};

const TITLE: &str = "Crop Advisory System";
const FORM_HEADING: &str = "Enter Farm Details";
const RESULTS_HEADING: &str = "Recommended Crops & Expected Yield";

/// Panel holding the farm form and the last result
pub struct AdvisoryPanel {
    /// States known to the crop model, sorted
    states: Vec<String>,
    /// Seasons known to the crop model, sorted
    seasons: Vec<String>,
    /// Current form values
    observation: FarmObservation,
    /// Number of crops to recommend
    top_k: usize,
    /// Where the models came from
    artifact_root: String,
    /// Last successful result
    report: Option<AdvisoryReport>,
    /// Last failure, shown in red
    error: Option<String>,
    /// Export outcome (message, is_error)
    export_status: Option<(String, bool)>,
}

impl AdvisoryPanel {
    pub fn new(advisor: &AdvisoryContext, config: &Config) -> Self {
        let states = advisor.known_states();
        let seasons = advisor.known_seasons();
        // crop year stays at the form default; only the CLI overrides it
        let observation = FarmObservation::new(
            states.first().cloned().unwrap_or_default(),
            seasons.first().cloned().unwrap_or_default(),
        );

        let label_count = advisor.crop_labels().len().max(1);

        Self {
            states,
            seasons,
            observation,
            top_k: config.top_k.clamp(1, label_count),
            artifact_root: config.artifact_root().display().to_string(),
            report: None,
            error: None,
            export_status: None,
        }
    }

    /// Render the panel UI
    pub fn ui(&mut self, ui: &mut Ui, advisor: &AdvisoryContext) {
        ui.heading(TITLE);
        ui.label(
            RichText::new(format!("Models loaded successfully from {}", self.artifact_root))
                .color(Color32::LIGHT_GREEN),
        );
        ui.add_space(10.0);

        ui.label(RichText::new(FORM_HEADING).strong().size(16.0));
        ui.add_space(5.0);

        self.render_form(ui, advisor.crop_labels().len());

        ui.add_space(8.0);
        let button = egui::Button::new(RichText::new("Get Crop Recommendation").size(16.0));
        if ui.add(button).clicked() {
            self.submit(advisor);
        }

        if let Some(ref error) = self.error {
            ui.add_space(5.0);
            ui.label(RichText::new(error).color(Color32::RED));
        }

        if self.report.is_some() {
            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);
            self.render_results(ui);
            ui.add_space(8.0);
            self.render_export(ui);
        }
    }

    fn render_form(&mut self, ui: &mut Ui, label_count: usize) {
        egui::Grid::new("farm_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("State");
                egui::ComboBox::from_id_salt("state")
                    .selected_text(self.observation.state.as_str())
                    .width(200.0)
                    .show_ui(ui, |ui| {
                        for state in &self.states {
                            ui.selectable_value(&mut self.observation.state, state.clone(), state);
                        }
                    });
                ui.end_row();

                ui.label("Season");
                egui::ComboBox::from_id_salt("season")
                    .selected_text(self.observation.season.as_str())
                    .width(200.0)
                    .show_ui(ui, |ui| {
                        for season in &self.seasons {
                            ui.selectable_value(&mut self.observation.season, season.clone(), season);
                        }
                    });
                ui.end_row();

                for field in NumericField::ALL {
                    ui.label(field.label());
                    // the range clamps typed and dragged values to the minimum
                    ui.add(
                        egui::DragValue::new(field.value_mut(&mut self.observation))
                            .range(field.min()..=f64::MAX)
                            .speed(drag_speed(field))
                            .max_decimals(2),
                    );
                    ui.end_row();
                }

                ui.label("Crop year");
                ui.label(self.observation.crop_year.to_string());
                ui.end_row();

                ui.label("Recommendations");
                ui.add(egui::DragValue::new(&mut self.top_k).range(1..=label_count.max(1)));
                ui.end_row();
            });
    }

    fn submit(&mut self, advisor: &AdvisoryContext) {
        self.export_status = None;
        match advise(advisor, self.observation.clone(), self.top_k) {
            Ok(report) => {
                self.report = Some(report);
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "recommendation failed");
                self.report = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn render_results(&self, ui: &mut Ui) {
        let Some(ref report) = self.report else {
            return;
        };

        ui.label(RichText::new(RESULTS_HEADING).strong().size(16.0));
        ui.add_space(5.0);

        TableBuilder::new(ui)
            .striped(true)
            .column(Column::initial(220.0).at_least(120.0))
            .column(Column::remainder().at_least(100.0))
            .header(22.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Recommended Crop");
                });
                header.col(|ui| {
                    ui.strong("Expected Yield");
                });
            })
            .body(|mut body| {
                for rec in &report.recommendations {
                    body.row(20.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&rec.crop);
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.2}", rec.predicted_yield));
                        });
                    });
                }
            });
    }

    fn render_export(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui.button("Export to Excel").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Excel", &["xlsx"])
                    .set_file_name("crop_recommendation.xlsx")
                    .save_file()
                {
                    self.export_status = Some(self.export(&path));
                }
            }

            if let Some((ref msg, is_error)) = self.export_status {
                let color = if is_error {
                    Color32::RED
                } else {
                    Color32::LIGHT_GREEN
                };
                ui.label(RichText::new(msg).color(color));
            }
        });
    }

    fn export(&self, path: &Path) -> (String, bool) {
        let Some(ref report) = self.report else {
            return ("Nothing to export".to_string(), true);
        };
        match export_to_excel(&BatchResults::from(report.clone()), path) {
            Ok(()) => {
                info!(path = %path.display(), "exported recommendation");
                (format!("Saved {}", path.display()), false)
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                (e.to_string(), true)
            }
        }
    }
}

fn drag_speed(field: NumericField) -> f64 {
    match field {
        NumericField::Area => 0.1,
        _ => 1.0,
    }
}
