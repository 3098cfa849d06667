//! Top-k crop advisory
//!
//! Encodes the observation for the crop classifier, ranks the predicted
//! distribution, then asks the yield regressor about each selected crop.

use std::cmp::Ordering;

use tracing::debug;

use crate::model::{CropProbability, FarmObservation, FeatureRow, Recommendation};
use crate::predictor::{CropClassifier, FeatureEncoder, YieldRegressor};
use advisor_types::{columns, Error, Result};

/// Tolerance for a distribution's sum
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// The four loaded artifacts, read-only for the life of the process
pub struct AdvisoryContext {
    crop_model: Box<dyn CropClassifier>,
    yield_model: Box<dyn YieldRegressor>,
    crop_encoder: Box<dyn FeatureEncoder>,
    yield_encoder: Box<dyn FeatureEncoder>,
}

impl AdvisoryContext {
    pub fn new(
        crop_model: Box<dyn CropClassifier>,
        yield_model: Box<dyn YieldRegressor>,
        crop_encoder: Box<dyn FeatureEncoder>,
        yield_encoder: Box<dyn FeatureEncoder>,
    ) -> Self {
        Self {
            crop_model,
            yield_model,
            crop_encoder,
            yield_encoder,
        }
    }

    /// Crop labels known to the classifier, in native order
    pub fn crop_labels(&self) -> &[String] {
        self.crop_model.classes()
    }

    /// Sorted vocabulary of a categorical field of the crop preprocessor
    pub fn known_values(&self, field: &str) -> Vec<String> {
        let mut values = self
            .crop_encoder
            .categories(field)
            .map(|c| c.to_vec())
            .unwrap_or_default();
        values.sort();
        values
    }

    pub fn known_states(&self) -> Vec<String> {
        self.known_values(columns::STATE)
    }

    pub fn known_seasons(&self) -> Vec<String> {
        self.known_values(columns::SEASON)
    }

    /// Full classifier distribution for an observation, in label order
    pub fn crop_distribution(&self, observation: &FarmObservation) -> Result<Vec<CropProbability>> {
        let row = observation.to_feature_row();
        let probabilities = self.predict_probabilities(&row)?;
        Ok(self
            .crop_model
            .classes()
            .iter()
            .zip(probabilities)
            .map(|(crop, probability)| CropProbability {
                crop: crop.clone(),
                probability,
            })
            .collect())
    }

    /// The `k` most probable crops with their expected yields.
    ///
    /// Fails with `InvalidArgument` before touching any model when `k` is 0
    /// or larger than the label count.
    pub fn recommend(&self, observation: &FarmObservation, k: usize) -> Result<Vec<Recommendation>> {
        let label_count = self.crop_model.classes().len();
        if k == 0 || k > label_count {
            return Err(Error::InvalidArgument(format!(
                "k must be between 1 and {} (got {})",
                label_count, k
            )));
        }

        let row = observation.to_feature_row();
        let probabilities = self.predict_probabilities(&row)?;
        let classes = self.crop_model.classes();

        let mut recommendations = Vec::with_capacity(k);
        for index in rank_top_k(&probabilities, k) {
            let crop = &classes[index];
            let features = self.yield_encoder.transform(&row.with_crop(crop))?;
            let predicted_yield = self.yield_model.predict(&features)?;
            if !predicted_yield.is_finite() {
                return Err(Error::Model(format!(
                    "yield model returned {} for crop '{}'",
                    predicted_yield, crop
                )));
            }
            recommendations.push(Recommendation {
                crop: crop.clone(),
                predicted_yield,
                probability: probabilities[index],
            });
        }

        debug!(
            k,
            state = %observation.state,
            season = %observation.season,
            crops = ?recommendations.iter().map(|r| r.crop.as_str()).collect::<Vec<_>>(),
            "advisory complete"
        );
        Ok(recommendations)
    }

    fn predict_probabilities(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let features = self.crop_encoder.transform(row)?;
        let probabilities = self.crop_model.predict_proba(&features)?;
        check_distribution(&probabilities, self.crop_model.classes().len())?;
        Ok(probabilities)
    }
}

fn check_distribution(probabilities: &[f64], label_count: usize) -> Result<()> {
    if probabilities.len() != label_count {
        return Err(Error::Model(format!(
            "classifier returned {} probabilities for {} labels",
            probabilities.len(),
            label_count
        )));
    }
    if let Some(bad) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(Error::Model(format!("classifier returned probability {}", bad)));
    }
    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(Error::Model(format!("probabilities sum to {}", sum)));
    }
    Ok(())
}

/// Indices of the `k` largest probabilities, highest first.
///
/// Equal probabilities keep label order: the lower index ranks first.
pub fn rank_top_k(probabilities: &[f64], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..probabilities.len()).collect();
    indices.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    indices.truncate(k);
    indices
}
