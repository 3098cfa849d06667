//! Advisory use cases: a single form submission, or a batch of observations

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use advisor_domain::model::{FarmObservation, Recommendation};
use advisor_domain::service::AdvisoryContext;
use advisor_types::{Error, Result};

/// Result of one advisory request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryReport {
    pub generated_at: DateTime<Utc>,
    pub observation: FarmObservation,
    pub k: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Validate the observation, then rank crops for it
pub fn advise(ctx: &AdvisoryContext, observation: FarmObservation, k: usize) -> Result<AdvisoryReport> {
    observation.validate()?;
    let recommendations = ctx.recommend(&observation, k)?;
    Ok(AdvisoryReport {
        generated_at: Utc::now(),
        observation,
        k,
        recommendations,
    })
}

/// Outcome for one batch row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// 1-based data row
    pub row: usize,
    pub observation: FarmObservation,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub k: usize,
    pub successful: usize,
    pub failed: usize,
    pub entries: Vec<BatchEntry>,
}

impl From<AdvisoryReport> for BatchResults {
    /// A single report as a one-row batch, for export
    fn from(report: AdvisoryReport) -> Self {
        Self {
            started_at: report.generated_at,
            finished_at: report.generated_at,
            k: report.k,
            successful: 1,
            failed: 0,
            entries: vec![BatchEntry {
                row: 1,
                observation: report.observation,
                recommendations: report.recommendations,
                error: None,
            }],
        }
    }
}

impl BatchResults {
    /// Read results previously written with `save`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Advise on every observation.
///
/// A failing row is recorded with its error and the run continues. An
/// invalid `k` fails the whole batch up front since no row could succeed.
pub fn advise_batch<F>(
    ctx: &AdvisoryContext,
    observations: Vec<FarmObservation>,
    k: usize,
    mut on_entry: F,
) -> Result<BatchResults>
where
    F: FnMut(&BatchEntry),
{
    let label_count = ctx.crop_labels().len();
    if k == 0 || k > label_count {
        return Err(Error::InvalidArgument(format!(
            "k must be between 1 and {} (got {})",
            label_count, k
        )));
    }

    let started_at = Utc::now();
    let mut entries = Vec::with_capacity(observations.len());

    for (i, observation) in observations.into_iter().enumerate() {
        let row = i + 1;
        let entry = match advise(ctx, observation.clone(), k) {
            Ok(report) => BatchEntry {
                row,
                observation,
                recommendations: report.recommendations,
                error: None,
            },
            Err(e) => {
                warn!(row, error = %e, "advisory failed");
                BatchEntry {
                    row,
                    observation,
                    recommendations: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        on_entry(&entry);
        entries.push(entry);
    }

    let successful = entries.iter().filter(|e| e.is_ok()).count();
    let failed = entries.len() - successful;
    info!(total = entries.len(), successful, failed, "batch complete");

    Ok(BatchResults {
        started_at,
        finished_at: Utc::now(),
        k,
        successful,
        failed,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_saved_probabilities_read_back_exactly() {
        let report = AdvisoryReport {
            generated_at: Utc::now(),
            observation: FarmObservation::new("Kerala", "Kharif"),
            k: 1,
            recommendations: vec![Recommendation {
                crop: "Coconut".to_string(),
                predicted_yield: 5.949999999999999,
                probability: 0.48460823251863355,
            }],
        };
        let results = BatchResults::from(report);

        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        results.save(&path).unwrap();
        let loaded = BatchResults::load(&path).unwrap();

        let rec = &loaded.entries[0].recommendations[0];
        assert_eq!(rec.probability.to_bits(), 0.48460823251863355_f64.to_bits());
        assert_eq!(rec.predicted_yield.to_bits(), 5.949999999999999_f64.to_bits());
        assert_eq!(loaded.successful, 1);
        assert_eq!(loaded.failed, 0);
    }
}
