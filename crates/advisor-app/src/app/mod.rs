//! Use cases

pub mod advisory_service;

pub use advisory_service::{advise, advise_batch, AdvisoryReport, BatchEntry, BatchResults};
