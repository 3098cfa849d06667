//! Application service layer - config, logging, model opening, batch runs, export

pub mod app;
pub mod config;
pub mod export;
pub mod logging;
pub mod models;
