pub mod output;
pub mod render;
pub mod theme;

use clap::{Parser, Subcommand};

/// Live, colorized test progress
#[derive(Parser)]
#[command(name = "sugar", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a JSON-lines test event stream
    Render(render::Args),

    /// Show the resolved theme and progress bar settings
    Theme(theme::Args),
}

/// Route `tracing` output to stderr at the given level (default `warn`).
pub fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level.unwrap_or("warn") {
        "off" => "off",
        "error" => "error",
        "warn" => "warn",
        "info" => "info",
        "debug" => "debug",
        other => {
            output::warning(&format!(
                "unknown log level '{}', defaulting to 'warn'",
                other
            ));
            "warn"
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Turn ANSI colors off for `--no-color` or `NO_COLOR`, or force them on.
pub fn set_color_override(no_color: bool, force: bool) {
    if no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    } else if force {
        colored::control::set_override(true);
    }
}
