//! Numeric form fields with their minimums and defaults

use crate::model::FarmObservation;
use advisor_types::columns;

/// Numeric inputs collected by the farm form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Area,
    AnnualRainfall,
    Fertilizer,
    Pesticide,
}

impl NumericField {
    pub const ALL: [NumericField; 4] = [
        NumericField::Area,
        NumericField::AnnualRainfall,
        NumericField::Fertilizer,
        NumericField::Pesticide,
    ];

    /// Form label, including the unit
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::Area => "Area (hectares)",
            NumericField::AnnualRainfall => "Annual Rainfall (mm)",
            NumericField::Fertilizer => "Fertilizer Used (kg)",
            NumericField::Pesticide => "Pesticide Used (kg)",
        }
    }

    /// Smallest accepted value
    pub fn min(&self) -> f64 {
        match self {
            NumericField::Area => 0.1,
            NumericField::AnnualRainfall => 0.0,
            NumericField::Fertilizer => 0.0,
            NumericField::Pesticide => 0.0,
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            NumericField::Area => 1.0,
            NumericField::AnnualRainfall => 1000.0,
            NumericField::Fertilizer => 500.0,
            NumericField::Pesticide => 20.0,
        }
    }

    /// Column name seen by the preprocessors
    pub fn column(&self) -> &'static str {
        match self {
            NumericField::Area => columns::AREA,
            NumericField::AnnualRainfall => columns::ANNUAL_RAINFALL,
            NumericField::Fertilizer => columns::FERTILIZER,
            NumericField::Pesticide => columns::PESTICIDE,
        }
    }

    pub fn value_of(&self, observation: &FarmObservation) -> f64 {
        match self {
            NumericField::Area => observation.area,
            NumericField::AnnualRainfall => observation.annual_rainfall,
            NumericField::Fertilizer => observation.fertilizer,
            NumericField::Pesticide => observation.pesticide,
        }
    }

    pub fn value_mut<'a>(&self, observation: &'a mut FarmObservation) -> &'a mut f64 {
        match self {
            NumericField::Area => &mut observation.area,
            NumericField::AnnualRainfall => &mut observation.annual_rainfall,
            NumericField::Fertilizer => &mut observation.fertilizer,
            NumericField::Pesticide => &mut observation.pesticide,
        }
    }

    /// Whether `value` satisfies this field's constraint
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_satisfy_minimums() {
        for field in NumericField::ALL {
            assert!(field.accepts(field.default_value()), "{:?}", field);
        }
    }

    #[test]
    fn test_area_minimum() {
        assert!(!NumericField::Area.accepts(0.05));
        assert!(NumericField::Area.accepts(0.1));
        assert!(NumericField::Pesticide.accepts(0.0));
        assert!(!NumericField::Pesticide.accepts(-1.0));
        assert!(!NumericField::AnnualRainfall.accepts(f64::NAN));
    }

    #[test]
    fn test_value_mut_writes_through() {
        let mut obs = FarmObservation::new("Kerala", "Kharif");
        *NumericField::AnnualRainfall.value_mut(&mut obs) = 1200.0;
        assert_eq!(NumericField::AnnualRainfall.value_of(&obs), 1200.0);
        assert_eq!(obs.annual_rainfall, 1200.0);
    }
}
