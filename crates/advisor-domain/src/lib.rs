//! Domain layer for crop advisory
//!
//! Holds the farm observation model, the seams for pretrained models, and the
//! top-k advisory routine that ties them together.

pub mod model;
pub mod predictor;
pub mod service;
