mod cli;
mod config;
mod error;
mod events;
mod render;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Command};

/// Status for failures of the renderer itself, as opposed to failed tests.
const RENDERER_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Render(args) => cli::render::run(args),
        Command::Theme(args) => cli::theme::run(args).map(|()| 0),
    };

    match result {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            cli::output::error(&format!("{e:#}"));
            ExitCode::from(RENDERER_ERROR)
        }
    }
}
