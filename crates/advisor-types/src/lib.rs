//! Core types for crop advisory

mod error;

pub use error::*;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Column names shared by the observation row and the preprocessor artifacts
pub mod columns {
    pub const CROP_YEAR: &str = "Crop_Year";
    pub const SEASON: &str = "Season";
    pub const STATE: &str = "State";
    pub const AREA: &str = "Area";
    pub const ANNUAL_RAINFALL: &str = "Annual_Rainfall";
    pub const FERTILIZER: &str = "Fertilizer";
    pub const PESTICIDE: &str = "Pesticide";
    pub const CROP: &str = "Crop";
}

/// Crop year used when the form does not ask for one
pub const DEFAULT_CROP_YEAR: i32 = 2020;

/// Number of recommendations returned by default
pub const DEFAULT_TOP_K: usize = 3;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
