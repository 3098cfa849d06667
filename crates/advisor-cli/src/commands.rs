//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{output_batch, output_categories, output_models, output_report};
use advisor_app::app::{advise, advise_batch, BatchResults};
use advisor_app::config::Config;
use advisor_app::export::export_to_excel;
use advisor_app::logging::{init_logging, LogConfig, LogLevel};
use advisor_app::models::{open_advisor, open_bundle};
use advisor_domain::model::{FarmObservation, NumericField};
use advisor_infra::observation_csv::load_observations_from_csv;
use advisor_types::{Error, OutputFormat, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<ExitCode> {
    // Load config
    let mut config = load_config(&cli.command, &Config::config_path()?)?;

    if let Err(e) = init_logging(&LogConfig::from_config(&config, cli.verbose)) {
        eprintln!("Warning: {}", e);
    }

    // Override from CLI args
    if let Some(ref dir) = cli.artifacts {
        config.artifact_root = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);
    debug!(artifact_root = %config.artifact_root().display(), "configuration loaded");

    match &cli.command {
        Commands::Recommend {
            state,
            season,
            area,
            rainfall,
            fertilizer,
            pesticide,
            crop_year,
            top_k,
        } => {
            let observation = FarmObservation {
                crop_year: crop_year.unwrap_or(config.crop_year),
                area: area.unwrap_or(NumericField::Area.default_value()),
                annual_rainfall: rainfall.unwrap_or(NumericField::AnnualRainfall.default_value()),
                fertilizer: fertilizer.unwrap_or(NumericField::Fertilizer.default_value()),
                pesticide: pesticide.unwrap_or(NumericField::Pesticide.default_value()),
                ..FarmObservation::new(state.as_str(), season.as_str())
            };
            let k = top_k.unwrap_or(config.top_k);
            cmd_recommend(&config, observation, k, output_format)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Batch {
            input,
            output,
            top_k,
        } => {
            let k = top_k.unwrap_or(config.top_k);
            cmd_batch(&config, input, output.as_deref(), k, output_format)
        }

        Commands::Export { results, output } => {
            cmd_export(results.clone(), output.clone())?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Categories => {
            cmd_categories(&config, output_format)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Models => {
            cmd_models(&config, output_format)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Config {
            show,
            set_artifacts,
            set_top_k,
            set_output,
            set_crop_year,
            set_log_level,
            reset,
        } => {
            let update = ConfigUpdate {
                artifacts: set_artifacts.clone(),
                top_k: *set_top_k,
                output: *set_output,
                crop_year: *set_crop_year,
                log_level: set_log_level.clone(),
            };
            cmd_config(*show, update, *reset)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_recommend(
    config: &Config,
    observation: FarmObservation,
    k: usize,
    output_format: OutputFormat,
) -> Result<()> {
    let ctx = open_advisor(config)?;
    let report = advise(&ctx, observation, k)?;
    output_report(output_format, &report)
}

/// Config for this run. An unreadable file only blocks commands other than `config --reset`.
fn load_config(command: &Commands, path: &Path) -> Result<Config> {
    match Config::load_from(path) {
        Err(e) if matches!(command, Commands::Config { reset: true, .. }) => {
            eprintln!("Warning: ignoring unreadable configuration: {}", e);
            Ok(Config::default())
        }
        other => other,
    }
}

fn cmd_batch(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    k: usize,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let results = run_batch(config, input, k)?;

    match output {
        Some(output_path) => {
            write_batch_file(&results, output_path)?;
            println!("Results saved to: {}", output_path.display());
            // failures still need to be visible without opening the file
            for line in failure_lines(&results) {
                eprintln!("{}", line);
            }
        }
        None => output_batch(output_format, &results)?,
    }

    Ok(batch_exit_code(&results))
}

/// Advise on every CSV row with a progress bar
fn run_batch(config: &Config, input: &Path, k: usize) -> Result<BatchResults> {
    let observations = load_observations_from_csv(input)?;
    if observations.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "No rows found in {}",
            input.display()
        )));
    }

    let ctx = open_advisor(config)?;

    // Setup progress bar
    let pb = ProgressBar::new(observations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let results = advise_batch(&ctx, observations, k, |entry| {
        pb.set_message(format!("{} / {}", entry.observation.state, entry.observation.season));
        pb.inc(1);
    })?;
    pb.finish_with_message("Complete");
    Ok(results)
}

/// Excel for `.xlsx`, JSON otherwise
fn write_batch_file(results: &BatchResults, output_path: &Path) -> Result<()> {
    if is_xlsx(output_path) {
        export_to_excel(results, output_path)
    } else {
        results.save(output_path)
    }
}

fn failure_lines(results: &BatchResults) -> Vec<String> {
    results
        .entries
        .iter()
        .filter(|e| !e.is_ok())
        .map(|e| format!("Row {} failed: {}", e.row, e.error.as_deref().unwrap_or_default()))
        .collect()
}

fn batch_exit_code(results: &BatchResults) -> ExitCode {
    if results.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}

fn cmd_export(results_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    // Load results
    let results = BatchResults::load(&results_path)?;

    // Determine output path
    let output_path = output.unwrap_or_else(|| {
        let stem = results_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("results");
        results_path.with_file_name(format!("{}.xlsx", stem))
    });

    // Export to Excel
    export_to_excel(&results, &output_path)?;

    println!("Exported to: {}", output_path.display());
    Ok(())
}

fn cmd_categories(config: &Config, output_format: OutputFormat) -> Result<()> {
    let ctx = open_advisor(config)?;
    output_categories(
        output_format,
        &ctx.known_states(),
        &ctx.known_seasons(),
        ctx.crop_labels(),
    )
}

fn cmd_models(config: &Config, output_format: OutputFormat) -> Result<()> {
    let bundle = open_bundle(config)?;
    output_models(output_format, &bundle)
}

/// Values given with `config --set-*`
#[derive(Debug, Default)]
struct ConfigUpdate {
    artifacts: Option<PathBuf>,
    top_k: Option<usize>,
    output: Option<OutputFormat>,
    crop_year: Option<i32>,
    log_level: Option<String>,
}

impl ConfigUpdate {
    /// Apply every value, or none if any is invalid. Returns whether anything changed.
    fn apply(self, config: &mut Config) -> Result<bool> {
        if self.top_k == Some(0) {
            return Err(Error::InvalidArgument("top k must be at least 1".to_string()));
        }
        let log_level = match self.log_level {
            Some(ref level) => Some(
                LogLevel::parse(level)
                    .ok_or_else(|| Error::InvalidArgument(format!("Unknown log level: {}", level)))?,
            ),
            None => None,
        };

        let mut modified = false;

        if let Some(dir) = self.artifacts {
            config.artifact_root = Some(dir);
            modified = true;
        }

        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
            modified = true;
        }

        if let Some(output_format) = self.output {
            config.output_format = output_format;
            modified = true;
        }

        if let Some(crop_year) = self.crop_year {
            config.crop_year = crop_year;
            modified = true;
        }

        if let Some(level) = log_level {
            config.log_level = level.to_string().to_lowercase();
            modified = true;
        }

        Ok(modified)
    }
}

fn cmd_config(show: bool, update: ConfigUpdate, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let modified = update.apply(&mut config)?;

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_types::ConfigError;
    use std::fs;
    use tempfile::tempdir;

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("tests")
            .join("fixtures")
    }

    fn fixture_config() -> Config {
        Config {
            artifact_root: Some(fixtures_dir().join("artifacts")),
            ..Config::default()
        }
    }

    fn code(exit: ExitCode) -> String {
        format!("{:?}", exit)
    }

    #[test]
    fn test_is_xlsx() {
        assert!(is_xlsx(Path::new("out.xlsx")));
        assert!(is_xlsx(Path::new("dir/OUT.XLSX")));
        assert!(!is_xlsx(Path::new("out.json")));
        assert!(!is_xlsx(Path::new("out")));
    }

    #[test]
    fn test_batch_with_failed_rows_exits_with_failure() {
        let results = run_batch(&fixture_config(), &fixtures_dir().join("farms.csv"), 2).unwrap();
        assert_eq!(results.successful, 2);
        assert_eq!(results.failed, 2);
        assert_eq!(code(batch_exit_code(&results)), code(ExitCode::FAILURE));

        let lines = failure_lines(&results);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Row 3 failed: "));
        assert!(lines[0].contains("Atlantis"));
        assert!(lines[1].starts_with("Row 4 failed: "));
    }

    #[test]
    fn test_clean_batch_exits_with_success() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("farms.csv");
        fs::write(
            &input,
            "State,Season,Area,Annual_Rainfall,Fertilizer,Pesticide,Crop_Year\nKerala,Kharif,2.0,1200,600,25,2020\n",
        )
        .unwrap();

        let results = run_batch(&fixture_config(), &input, 3).unwrap();
        assert_eq!(results.failed, 0);
        assert!(failure_lines(&results).is_empty());
        assert_eq!(code(batch_exit_code(&results)), code(ExitCode::SUCCESS));
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("farms.csv");
        fs::write(&input, "State,Season,Area,Annual_Rainfall,Fertilizer,Pesticide,Crop_Year\n").unwrap();
        assert!(matches!(
            run_batch(&fixture_config(), &input, 3),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_json_output_round_trips() {
        let results = run_batch(&fixture_config(), &fixtures_dir().join("farms.csv"), 2).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        write_batch_file(&results, &path).unwrap();

        let loaded = BatchResults::load(&path).unwrap();
        assert_eq!(loaded.entries.len(), 4);
        assert_eq!(loaded.failed, 2);
        for (saved, original) in loaded.entries.iter().zip(&results.entries) {
            assert_eq!(saved.recommendations, original.recommendations);
            assert_eq!(saved.error, original.error);
        }
    }

    #[test]
    fn test_xlsx_output_is_a_workbook() {
        let results = run_batch(&fixture_config(), &fixtures_dir().join("farms.csv"), 2).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        write_batch_file(&results, &path).unwrap();

        // xlsx is a zip archive, not JSON
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
        assert!(BatchResults::load(&path).is_err());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let mut config = Config::default();
        let update = ConfigUpdate {
            top_k: Some(5),
            log_level: Some("loud".to_string()),
            ..ConfigUpdate::default()
        };
        assert!(matches!(update.apply(&mut config), Err(Error::InvalidArgument(_))));
        // nothing applied
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_log_level_is_normalized() {
        let mut config = Config::default();
        let update = ConfigUpdate {
            log_level: Some("WARNING".to_string()),
            ..ConfigUpdate::default()
        };
        assert!(update.apply(&mut config).unwrap());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_zero_top_k_is_rejected() {
        let mut config = Config::default();
        let update = ConfigUpdate {
            top_k: Some(0),
            ..ConfigUpdate::default()
        };
        assert!(update.apply(&mut config).is_err());
        assert!(!ConfigUpdate::default().apply(&mut config).unwrap());
    }

    #[test]
    fn test_reset_works_with_corrupt_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let reset = Commands::Config {
            show: false,
            set_artifacts: None,
            set_top_k: None,
            set_output: None,
            set_crop_year: None,
            set_log_level: None,
            reset: true,
        };
        assert_eq!(load_config(&reset, &path).unwrap(), Config::default());

        assert!(matches!(
            load_config(&Commands::Categories, &path),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }
}
