//! Seams for the pretrained artifacts
//!
//! The advisory service only sees these traits. File-backed implementations
//! live in the infrastructure crate; tests substitute in-memory mocks.

use crate::model::FeatureRow;
use advisor_types::{Result, SchemaError};

/// Maps a raw feature row to the numeric vector a model expects
pub trait FeatureEncoder {
    /// Encode one row
    fn transform(&self, row: &FeatureRow) -> std::result::Result<Vec<f64>, SchemaError>;

    /// Length of the vectors produced by `transform`
    fn output_width(&self) -> usize;

    /// Learned vocabulary of a categorical field, in learned order.
    ///
    /// `None` if the field is not encoded categorically.
    fn categories(&self, field: &str) -> Option<&[String]>;
}

/// Feature vector -> probability per crop label
pub trait CropClassifier {
    /// Known crop labels, in the model's native order
    fn classes(&self) -> &[String];

    /// One probability per entry of `classes()`
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// Feature vector (crop included) -> expected yield
pub trait YieldRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64>;
}
