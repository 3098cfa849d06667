//! Crop Advisor - top-k crop recommendations with expected yields
//!
//! A CLI tool that runs pretrained crop and yield models over farm attributes.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match commands::execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
