//! Serialized model and preprocessor artifacts
//!
//! Every artifact is a JSON document produced by the training pipeline.
//! The types here deserialize those documents and implement the domain's
//! predictor traits on top of them.

mod classifier;
mod loader;
mod preprocessor;
mod regressor;
mod tree;

pub use classifier::{ClassifierArtifact, ForestClassifier, LogisticClassifier};
pub use loader::{ArtifactInfo, ArtifactPaths, ModelBundle, MANIFEST_FILE};
pub use preprocessor::{HandleUnknown, TabularPreprocessor, Transformer};
pub use regressor::{ForestRegressor, LinearRegressor, RegressorArtifact};
pub use tree::{DecisionTree, TreeNode};
