//! CSV loader for batch advisory input
//!
//! Expected header (order free, `Crop_Year` optional):
//! State, Season, Area, Annual_Rainfall, Fertilizer, Pesticide, Crop_Year

use std::path::Path;

use serde::Deserialize;

use advisor_domain::model::FarmObservation;
use advisor_types::{Result, DEFAULT_CROP_YEAR};

#[derive(Debug, Deserialize)]
struct ObservationRecord {
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Season")]
    season: String,
    #[serde(rename = "Area")]
    area: f64,
    #[serde(rename = "Annual_Rainfall")]
    annual_rainfall: f64,
    #[serde(rename = "Fertilizer")]
    fertilizer: f64,
    #[serde(rename = "Pesticide")]
    pesticide: f64,
    #[serde(rename = "Crop_Year", default)]
    crop_year: Option<i32>,
}

impl From<ObservationRecord> for FarmObservation {
    fn from(r: ObservationRecord) -> Self {
        FarmObservation {
            crop_year: r.crop_year.unwrap_or(DEFAULT_CROP_YEAR),
            season: r.season,
            state: r.state,
            area: r.area,
            annual_rainfall: r.annual_rainfall,
            fertilizer: r.fertilizer,
            pesticide: r.pesticide,
        }
    }
}

/// Load every row of a CSV file as an observation.
///
/// A malformed row fails the whole load; the error carries its position.
pub fn load_observations_from_csv(path: &Path) -> Result<Vec<FarmObservation>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut observations = Vec::new();
    for record in reader.deserialize::<ObservationRecord>() {
        observations.push(record?.into());
    }
    Ok(observations)
}
