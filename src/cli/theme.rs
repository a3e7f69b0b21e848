use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;

use crate::cli::output;
use crate::config;
use crate::render::theme::{color_name, Glyph, Role, Theme};

/// Arguments for the `sugar theme` subcommand.
#[derive(ClapArgs)]
pub struct Args {
    /// Config file (default: $SUGAR_CONFIG, ./sugar.toml, ~/.sugar.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long)]
    pub no_color: bool,

    /// Logging verbosity for stderr: off, error, warn, info, debug.
    #[arg(long)]
    pub log_level: Option<String>,
}

const GLYPHS: [(&str, Glyph); 8] = [
    ("passed", Glyph::Passed),
    ("skipped", Glyph::Skipped),
    ("failed", Glyph::Failed),
    ("failed_not_call", Glyph::FailedNotCall),
    ("xfailed_skipped", Glyph::XfailedSkipped),
    ("xfailed_failed", Glyph::XfailedFailed),
    ("unknown", Glyph::Unknown),
    ("rerun", Glyph::Rerun),
];

pub fn run(args: Args) -> Result<()> {
    super::init_tracing(args.log_level.as_deref());
    super::set_color_override(args.no_color, false);

    let source = args.config.clone().or_else(config::discover_config);
    let cfg = config::load(args.config.as_deref())?;
    let theme = Theme::from_config(&cfg.theme);
    let bar_length = config::bar_length(&cfg)?;

    match &source {
        Some(path) => println!("config: {}", path.display()),
        None => println!("config: (built-in defaults)"),
    }
    println!();

    output::header_stdout("Colors");
    for role in Role::ALL {
        let name = color_name(theme.color(role));
        println!("  {:<24} {}", role.key(), theme.paint(&name, role));
    }
    println!();

    output::header_stdout("Symbols");
    for (key, glyph) in GLYPHS {
        println!("  {:<24} {}", format!("symbol_{key}"), theme.symbol(glyph));
    }
    println!();

    println!("progressbar_length: {bar_length}");
    Ok(())
}
