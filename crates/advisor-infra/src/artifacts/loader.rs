//! Loading the four artifacts from an artifact root
//!
//! Default layout under the root:
//!
//! ```text
//! models/crop_model.json
//! models/yield_model.json
//! data/processed/preprocess_crop.json
//! data/processed/preprocess_yield.json
//! ```
//!
//! An `artifacts.toml` at the root may override any of these paths.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use super::{ClassifierArtifact, RegressorArtifact, TabularPreprocessor};
use advisor_domain::predictor::{CropClassifier, FeatureEncoder};
use advisor_domain::service::AdvisoryContext;
use advisor_types::{columns, ArtifactError, Result};

/// Optional manifest file name at the artifact root
pub const MANIFEST_FILE: &str = "artifacts.toml";

/// Artifact file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    #[serde(default = "default_crop_model")]
    pub crop_model: PathBuf,
    #[serde(default = "default_yield_model")]
    pub yield_model: PathBuf,
    #[serde(default = "default_crop_preprocessor")]
    pub crop_preprocessor: PathBuf,
    #[serde(default = "default_yield_preprocessor")]
    pub yield_preprocessor: PathBuf,
}

fn default_crop_model() -> PathBuf {
    PathBuf::from("models/crop_model.json")
}

fn default_yield_model() -> PathBuf {
    PathBuf::from("models/yield_model.json")
}

fn default_crop_preprocessor() -> PathBuf {
    PathBuf::from("data/processed/preprocess_crop.json")
}

fn default_yield_preprocessor() -> PathBuf {
    PathBuf::from("data/processed/preprocess_yield.json")
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            crop_model: default_crop_model(),
            yield_model: default_yield_model(),
            crop_preprocessor: default_crop_preprocessor(),
            yield_preprocessor: default_yield_preprocessor(),
        }
    }
}

impl ArtifactPaths {
    /// Paths under `root`, honoring `artifacts.toml` if present
    pub fn resolve(root: &Path) -> Result<Self> {
        let manifest_path = root.join(MANIFEST_FILE);
        let relative = if manifest_path.exists() {
            let content = fs::read_to_string(&manifest_path)?;
            toml::from_str(&content).map_err(|e| ArtifactError::Corrupt {
                path: manifest_path.clone(),
                reason: e.to_string(),
            })?
        } else {
            ArtifactPaths::default()
        };
        Ok(relative.under(root))
    }

    fn under(self, root: &Path) -> Self {
        Self {
            crop_model: root.join(self.crop_model),
            yield_model: root.join(self.yield_model),
            crop_preprocessor: root.join(self.crop_preprocessor),
            yield_preprocessor: root.join(self.yield_preprocessor),
        }
    }
}

/// Where an artifact came from and what it was
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub role: &'static str,
    pub path: PathBuf,
    pub kind: &'static str,
    pub sha256: String,
}

/// The four artifacts, loaded and cross-checked
#[derive(Debug)]
pub struct ModelBundle {
    pub crop_model: ClassifierArtifact,
    pub yield_model: RegressorArtifact,
    pub crop_preprocessor: TabularPreprocessor,
    pub yield_preprocessor: TabularPreprocessor,
    pub artifacts: Vec<ArtifactInfo>,
}

impl ModelBundle {
    /// Load all artifacts under `root`
    pub fn load(root: &Path) -> Result<Self> {
        let paths = ArtifactPaths::resolve(root)?;
        Self::load_paths(&paths)
    }

    pub fn load_paths(paths: &ArtifactPaths) -> Result<Self> {
        let (crop_model, crop_model_hash): (ClassifierArtifact, _) = read_artifact(&paths.crop_model)?;
        check(&paths.crop_model, crop_model.validate())?;

        let (yield_model, yield_model_hash): (RegressorArtifact, _) = read_artifact(&paths.yield_model)?;
        check(&paths.yield_model, yield_model.validate())?;

        let (crop_preprocessor, crop_prep_hash): (TabularPreprocessor, _) =
            read_artifact(&paths.crop_preprocessor)?;
        check(&paths.crop_preprocessor, crop_preprocessor.validate())?;

        let (yield_preprocessor, yield_prep_hash): (TabularPreprocessor, _) =
            read_artifact(&paths.yield_preprocessor)?;
        check(&paths.yield_preprocessor, yield_preprocessor.validate())?;

        let artifacts = vec![
            ArtifactInfo {
                role: "crop model",
                path: paths.crop_model.clone(),
                kind: crop_model.kind(),
                sha256: crop_model_hash,
            },
            ArtifactInfo {
                role: "yield model",
                path: paths.yield_model.clone(),
                kind: yield_model.kind(),
                sha256: yield_model_hash,
            },
            ArtifactInfo {
                role: "crop preprocessor",
                path: paths.crop_preprocessor.clone(),
                kind: "column_transformer",
                sha256: crop_prep_hash,
            },
            ArtifactInfo {
                role: "yield preprocessor",
                path: paths.yield_preprocessor.clone(),
                kind: "column_transformer",
                sha256: yield_prep_hash,
            },
        ];

        let bundle = Self {
            crop_model,
            yield_model,
            crop_preprocessor,
            yield_preprocessor,
            artifacts,
        };
        bundle.check_compatible()?;

        for artifact in &bundle.artifacts {
            info!(
                role = artifact.role,
                kind = artifact.kind,
                path = %artifact.path.display(),
                sha256 = %artifact.sha256,
                "artifact loaded"
            );
        }
        Ok(bundle)
    }

    /// Cross-artifact checks: widths line up and vocabularies cover each other
    fn check_compatible(&self) -> Result<()> {
        let crop_width = self.crop_preprocessor.output_width();
        if crop_width != self.crop_model.n_features() {
            return Err(ArtifactError::Incompatible(format!(
                "crop preprocessor emits {} features, crop model expects {}",
                crop_width,
                self.crop_model.n_features()
            ))
            .into());
        }

        let yield_width = self.yield_preprocessor.output_width();
        if yield_width != self.yield_model.n_features() {
            return Err(ArtifactError::Incompatible(format!(
                "yield preprocessor emits {} features, yield model expects {}",
                yield_width,
                self.yield_model.n_features()
            ))
            .into());
        }

        for field in [columns::STATE, columns::SEASON] {
            if self.crop_preprocessor.categories(field).is_none() {
                return Err(ArtifactError::Incompatible(format!(
                    "crop preprocessor has no vocabulary for {}",
                    field
                ))
                .into());
            }
        }

        let known_crops = self
            .yield_preprocessor
            .categories(columns::CROP)
            .ok_or_else(|| {
                ArtifactError::Incompatible("yield preprocessor does not encode Crop".to_string())
            })?;
        if let Some(missing) = self
            .crop_model
            .classes()
            .iter()
            .find(|c| !known_crops.contains(*c))
        {
            return Err(ArtifactError::Incompatible(format!(
                "crop '{}' is unknown to the yield preprocessor",
                missing
            ))
            .into());
        }
        Ok(())
    }

    /// Hand the artifacts to the advisory service
    pub fn into_context(self) -> AdvisoryContext {
        AdvisoryContext::new(
            Box::new(self.crop_model),
            Box::new(self.yield_model),
            Box::new(self.crop_preprocessor),
            Box::new(self.yield_preprocessor),
        )
    }
}

/// Read and parse one JSON artifact, returning it with its SHA-256
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<(T, String)> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ArtifactError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    })?;
    let hash = format!("{:x}", Sha256::digest(&bytes));
    let value = serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok((value, hash))
}

fn check(path: &Path, validation: std::result::Result<(), String>) -> Result<()> {
    validation.map_err(|reason| {
        ArtifactError::Corrupt {
            path: path.to_path_buf(),
            reason,
        }
        .into()
    })
}
