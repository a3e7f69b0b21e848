use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;

use crate::config;
use crate::events;
use crate::render::annotate::{FailureAnnotator, NoAnnotations, TraceArtifactAnnotator};
use crate::render::failure::TracebackStyle;
use crate::render::plain::PlainReporter;
use crate::render::session::{SessionOptions, SugarSession};
use crate::render::theme::Theme;
use crate::render::{terminal_width, Reporter};

/// Arguments for the `sugar render` subcommand.
#[derive(ClapArgs)]
pub struct Args {
    /// Read events from a file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Render progress even when stdout is not a terminal
    #[arg(long)]
    pub force_sugar: bool,

    /// Show decoded crash lines in the summary
    #[arg(long)]
    pub old_summary: bool,

    /// How failures are printed as they happen
    #[arg(long, value_enum, default_value_t = TracebackStyle::Long)]
    pub tb: TracebackStyle,

    /// One line per test instead of one per file
    #[arg(short, long)]
    pub verbose: bool,

    /// Override terminal width (default: $COLUMNS or 80)
    #[arg(long)]
    pub width: Option<usize>,

    /// Config file (default: $SUGAR_CONFIG, ./sugar.toml, ~/.sugar.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long)]
    pub no_color: bool,

    /// Directory searched for recorded browser traces of failed tests
    #[arg(long, default_value = "test-results")]
    pub trace_dir: PathBuf,

    /// Do not look for trace artifacts
    #[arg(long)]
    pub no_trace: bool,

    /// Logging verbosity for stderr: off, error, warn, info, debug.
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Render the event stream and return the process exit status.
pub fn run(args: Args) -> Result<i32> {
    super::init_tracing(args.log_level.as_deref());

    let rich = args.force_sugar || io::stdout().is_terminal();
    super::set_color_override(args.no_color, args.force_sugar);

    let cfg = config::load(args.config.as_deref())?;
    let theme = Theme::from_config(&cfg.theme);
    let bar_length = config::bar_length(&cfg)?;

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut reporter: Box<dyn Reporter> = if rich {
        let options = SessionOptions {
            verbose: args.verbose,
            tb_style: args.tb,
            old_summary: args.old_summary,
            bar_length,
            width: args.width,
        };
        let annotator: Box<dyn FailureAnnotator> = if args.no_trace {
            Box::new(NoAnnotations)
        } else {
            let root = std::env::current_dir().context("failed to read working directory")?;
            Box::new(TraceArtifactAnnotator::new(root, &args.trace_dir))
        };
        Box::new(SugarSession::new(options, theme, io::stdout()).with_annotator(annotator))
    } else {
        tracing::debug!("stdout is not a terminal, using plain output");
        Box::new(PlainReporter::new(
            io::stdout(),
            args.tb,
            terminal_width(args.width),
        ))
    };

    for event in events::read_events(reader) {
        let event = event.context("failed to read event stream")?;
        reporter
            .handle(&event)
            .context("failed to write to terminal")?;
    }

    let outcome = reporter.finish().context("failed to write summary")?;
    Ok(outcome.exit_code())
}
