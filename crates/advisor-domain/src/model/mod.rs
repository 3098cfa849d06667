//! Domain model types

pub mod feature_row;
pub mod form;
pub mod observation;
pub mod recommendation;

pub use feature_row::{FeatureRow, FeatureValue};
pub use form::NumericField;
pub use observation::FarmObservation;
pub use recommendation::{CropProbability, Recommendation};
