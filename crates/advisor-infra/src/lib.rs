//! Infrastructure layer - artifact formats, artifact loading, CSV input

pub mod artifacts;
pub mod observation_csv;
