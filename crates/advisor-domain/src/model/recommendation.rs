use serde::{Deserialize, Serialize};

/// Probability the classifier assigns to one crop label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProbability {
    pub crop: String,
    pub probability: f64,
}

/// A recommended crop with its expected yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub crop: String,
    pub predicted_yield: f64,
    /// Classifier probability the ranking was based on
    pub probability: f64,
}
