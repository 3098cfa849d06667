//! Output formatting module

use advisor_app::app::{AdvisoryReport, BatchResults};
use advisor_domain::model::Recommendation;
use advisor_domain::predictor::{CropClassifier, FeatureEncoder};
use advisor_infra::artifacts::ModelBundle;
use advisor_types::{OutputFormat, Result};
use serde_json::json;

pub fn output_report(output_format: OutputFormat, report: &AdvisoryReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(report)?;
        println!("{}", content);
        return Ok(());
    }

    let obs = &report.observation;
    println!("\nCrop Recommendation");
    println!("===================");
    println!("State:           {}", obs.state);
    println!("Season:          {}", obs.season);
    println!("Crop year:       {}", obs.crop_year);
    println!("Area:            {:.2} ha", obs.area);
    println!("Rainfall:        {:.1} mm", obs.annual_rainfall);
    println!("Fertilizer:      {:.1} kg", obs.fertilizer);
    println!("Pesticide:       {:.1} kg", obs.pesticide);
    println!();
    print_recommendations(&report.recommendations);
    Ok(())
}

fn print_recommendations(recommendations: &[Recommendation]) {
    print!("{}", recommendation_table(recommendations));
}

/// Crop and expected yield, one row per recommendation
fn recommendation_table(recommendations: &[Recommendation]) -> String {
    let mut table = format!("{:<20} {:>14}\n", "Recommended Crop", "Expected Yield");
    table.push_str(&"-".repeat(35));
    table.push('\n');
    for rec in recommendations {
        table.push_str(&format!("{:<20} {:>14.2}\n", rec.crop, rec.predicted_yield));
    }
    table
}

pub fn output_batch(output_format: OutputFormat, results: &BatchResults) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(results)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nBatch Advisory Complete");
    println!("=======================");
    println!("Total:      {}", results.entries.len());
    println!("Successful: {}", results.successful);
    println!("Failed:     {}", results.failed);
    println!(
        "Duration:   {:.1}s",
        (results.finished_at - results.started_at).num_milliseconds() as f64 / 1000.0
    );

    for entry in &results.entries {
        println!(
            "\nRow {}: {} / {} ({:.2} ha)",
            entry.row, entry.observation.state, entry.observation.season, entry.observation.area
        );
        match entry.error {
            Some(ref error) => println!("  Failed: {}", error),
            None => print_recommendations(&entry.recommendations),
        }
    }
    Ok(())
}

pub fn output_categories(
    output_format: OutputFormat,
    states: &[String],
    seasons: &[String],
    crops: &[String],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let value = json!({ "states": states, "seasons": seasons, "crops": crops });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("States ({}):", states.len());
    for state in states {
        println!("  {}", state);
    }
    println!("\nSeasons ({}):", seasons.len());
    for season in seasons {
        println!("  {}", season);
    }
    println!("\nCrops ({}):", crops.len());
    for crop in crops {
        println!("  {}", crop);
    }
    Ok(())
}

pub fn output_models(output_format: OutputFormat, bundle: &ModelBundle) -> Result<()> {
    let labels = bundle.crop_model.classes().len();
    let crop_width = bundle.crop_preprocessor.output_width();
    let yield_width = bundle.yield_preprocessor.output_width();

    if output_format == OutputFormat::Json {
        let value = json!({
            "artifacts": bundle.artifacts,
            "crop_labels": labels,
            "crop_feature_width": crop_width,
            "yield_feature_width": yield_width,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("\nLoaded Artifacts");
    println!("================");
    for info in &bundle.artifacts {
        println!("{:<20} {} ({})", info.role, info.path.display(), info.kind);
        println!("{:<20} sha256 {}", "", info.sha256);
    }
    println!();
    println!("Crop labels:         {}", labels);
    println!("Crop feature width:  {}", crop_width);
    println!("Yield feature width: {}", yield_width);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_table_shows_crop_and_yield_only() {
        let recommendations = vec![
            Recommendation {
                crop: "Coconut".to_string(),
                predicted_yield: 5.95,
                probability: 0.48,
            },
            Recommendation {
                crop: "Rice".to_string(),
                predicted_yield: 2.6,
                probability: 0.21,
            },
        ];

        let table = recommendation_table(&recommendations);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);

        let header: Vec<&str> = lines[0].split("  ").map(str::trim).filter(|c| !c.is_empty()).collect();
        assert_eq!(header, vec!["Recommended Crop", "Expected Yield"]);
        assert!(!table.contains("Probability"));
        assert!(!table.contains('%'));

        assert!(lines[2].starts_with("Coconut"));
        assert!(lines[2].ends_with("5.95"));
        assert!(lines[3].ends_with("2.60"));
    }
}
