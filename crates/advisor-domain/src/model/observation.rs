//! Farm observation entered through the form

use serde::{Deserialize, Serialize};

use crate::model::{FeatureRow, FeatureValue, NumericField};
use advisor_types::{columns, Error, Result, DEFAULT_CROP_YEAR};

/// One farm's attributes for a single advisory request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmObservation {
    pub crop_year: i32,
    pub season: String,
    pub state: String,
    /// hectares
    pub area: f64,
    /// mm
    pub annual_rainfall: f64,
    /// kg
    pub fertilizer: f64,
    /// kg
    pub pesticide: f64,
}

impl FarmObservation {
    /// Observation with the form's default numeric values
    pub fn new(state: impl Into<String>, season: impl Into<String>) -> Self {
        Self {
            crop_year: DEFAULT_CROP_YEAR,
            season: season.into(),
            state: state.into(),
            area: NumericField::Area.default_value(),
            annual_rainfall: NumericField::AnnualRainfall.default_value(),
            fertilizer: NumericField::Fertilizer.default_value(),
            pesticide: NumericField::Pesticide.default_value(),
        }
    }

    /// Check the numeric fields against the form constraints
    pub fn validate(&self) -> Result<()> {
        for field in NumericField::ALL {
            let value = field.value_of(self);
            if !field.accepts(value) {
                return Err(Error::InvalidArgument(format!(
                    "{} must be at least {} (got {})",
                    field.label(),
                    field.min(),
                    value
                )));
            }
        }
        Ok(())
    }

    /// Row layout expected by the crop preprocessor
    pub fn to_feature_row(&self) -> FeatureRow {
        FeatureRow::new()
            .with(columns::CROP_YEAR, FeatureValue::Numeric(f64::from(self.crop_year)))
            .with(columns::SEASON, FeatureValue::Categorical(self.season.clone()))
            .with(columns::STATE, FeatureValue::Categorical(self.state.clone()))
            .with(columns::AREA, FeatureValue::Numeric(self.area))
            .with(columns::ANNUAL_RAINFALL, FeatureValue::Numeric(self.annual_rainfall))
            .with(columns::FERTILIZER, FeatureValue::Numeric(self.fertilizer))
            .with(columns::PESTICIDE, FeatureValue::Numeric(self.pesticide))
    }
}
