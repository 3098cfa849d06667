//! Opening the model artifacts named by the configuration

use std::path::Path;

use advisor_domain::service::AdvisoryContext;
use advisor_infra::artifacts::ModelBundle;
use advisor_types::Result;

use crate::config::Config;

/// Load the artifact bundle from the configured root
pub fn open_bundle(config: &Config) -> Result<ModelBundle> {
    ModelBundle::load(&config.artifact_root())
}

/// Load the artifact bundle from a custom root
pub fn open_bundle_at(root: &Path) -> Result<ModelBundle> {
    ModelBundle::load(root)
}

/// Load the artifacts and wrap them in an advisory context
pub fn open_advisor(config: &Config) -> Result<AdvisoryContext> {
    Ok(open_bundle(config)?.into_context())
}
