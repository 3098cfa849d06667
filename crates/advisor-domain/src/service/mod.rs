//! Domain services

pub mod advisory;

pub use advisory::{rank_top_k, AdvisoryContext};
