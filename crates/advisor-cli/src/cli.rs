//! CLI definition using clap

use advisor_types::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crop-advisor")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Recommend crops and expected yields from pretrained models")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding models/ and data/processed/. Uses config value if not specified.
    #[arg(long, short = 'a', global = true)]
    pub artifacts: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend crops for one farm
    Recommend {
        /// State, as known to the crop model (e.g. "Kerala")
        #[arg(long)]
        state: String,

        /// Season, as known to the crop model (e.g. "Kharif")
        #[arg(long)]
        season: String,

        /// Area in hectares (default 1.0)
        #[arg(long)]
        area: Option<f64>,

        /// Annual rainfall in mm (default 1000)
        #[arg(long)]
        rainfall: Option<f64>,

        /// Fertilizer used in kg (default 500)
        #[arg(long)]
        fertilizer: Option<f64>,

        /// Pesticide used in kg (default 20)
        #[arg(long)]
        pesticide: Option<f64>,

        /// Crop year. Uses config value if not specified.
        #[arg(long)]
        crop_year: Option<i32>,

        /// Number of crops to recommend. Uses config value if not specified.
        #[arg(long = "top-k", short = 'k')]
        top_k: Option<usize>,
    },

    /// Recommend crops for every row of a CSV file
    Batch {
        /// CSV with columns State,Season,Area,Annual_Rainfall,Fertilizer,Pesticide[,Crop_Year]
        input: PathBuf,

        /// Output file for results (.json or .xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Number of crops to recommend per row. Uses config value if not specified.
        #[arg(long = "top-k", short = 'k')]
        top_k: Option<usize>,
    },

    /// Export batch results to Excel
    Export {
        /// Path to JSON results file
        results: PathBuf,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the states and seasons the crop model knows
    Categories,

    /// Show the loaded artifacts
    Models,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set artifact root directory
        #[arg(long)]
        set_artifacts: Option<PathBuf>,

        /// Set default number of recommendations
        #[arg(long)]
        set_top_k: Option<usize>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set crop year fed to the models
        #[arg(long)]
        set_crop_year: Option<i32>,

        /// Set log level (trace, debug, info, warn, error)
        #[arg(long)]
        set_log_level: Option<String>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
