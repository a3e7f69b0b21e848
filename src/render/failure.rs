use crate::events::{CollectReport, CrashLocation, Phase, ResultEvent};
use crate::render::terminal::DrawCommand;
use crate::render::width::visible_width;

/// How much of a failure to print the moment it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TracebackStyle {
    /// Separator, phase header and the full failure text.
    #[default]
    Long,
    /// A single `path:line: message` crash line.
    Line,
    /// Nothing.
    No,
}

/// The parts of a failed report the printers need.
#[derive(Debug, Clone)]
pub struct FailureView<'a> {
    pub phase: Phase,
    pub headline: String,
    pub longrepr: Option<&'a str>,
    pub crash: Option<&'a CrashLocation>,
    pub expected_failure: bool,
}

impl<'a> From<&'a ResultEvent> for FailureView<'a> {
    fn from(report: &'a ResultEvent) -> Self {
        Self {
            phase: report.when,
            headline: report.headline(),
            longrepr: report.longrepr.as_deref(),
            crash: report.crash.as_ref(),
            expected_failure: report.xfail,
        }
    }
}

impl<'a> From<&'a CollectReport> for FailureView<'a> {
    fn from(report: &'a CollectReport) -> Self {
        Self {
            phase: Phase::Collect,
            headline: report.path.clone(),
            longrepr: report.longrepr.as_deref(),
            crash: report.crash.as_ref(),
            expected_failure: false,
        }
    }
}

/// `path:line: message` from the structured crash location, else the last
/// line of the failure text, else `?`.
pub fn crash_line(view: &FailureView<'_>) -> String {
    if let Some(crash) = view.crash {
        let lineno = crash
            .lineno
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        return format!("{}:{}: {}", crash.path, lineno, crash.message);
    }
    view.longrepr
        .and_then(|text| text.lines().rev().find(|l| !l.trim().is_empty()))
        .map(|l| l.trim_end().to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// Header naming the phase that failed.
pub fn failure_headline(view: &FailureView<'_>) -> String {
    let prefix = match view.phase {
        Phase::Collect => "ERROR collecting ",
        Phase::Setup => "ERROR at setup of ",
        Phase::Teardown => "ERROR at teardown of ",
        Phase::Call => "",
    };
    format!("{prefix}{}", view.headline)
}

/// `――― title ―――` spanning `width` columns.
pub fn separator(fill: char, title: &str, width: usize) -> String {
    if title.is_empty() {
        return fill.to_string().repeat(width);
    }
    let side = (width.saturating_sub(visible_width(title) + 2) / 2).max(1);
    let bar = fill.to_string().repeat(side);
    let mut line = format!("{bar} {title} {bar}");
    if visible_width(&line) < width {
        line.push(fill);
    }
    line
}

/// Draw commands for a failure printed inline. `None` when the report must
/// not be shown at all (it carries an expected-failure annotation).
pub fn print_failure(
    view: &FailureView<'_>,
    style: TracebackStyle,
    width: usize,
) -> Option<Vec<DrawCommand>> {
    if view.expected_failure {
        return None;
    }

    let mut out = Vec::new();
    match style {
        TracebackStyle::No => {}
        TracebackStyle::Line => out.push(DrawCommand::Line(crash_line(view))),
        TracebackStyle::Long => {
            out.push(DrawCommand::Line(String::new()));
            out.push(DrawCommand::Line(separator(
                '―',
                &failure_headline(view),
                width,
            )));
            match view.longrepr {
                Some(text) => {
                    for line in text.lines() {
                        out.push(DrawCommand::Line(line.to_string()));
                    }
                }
                None => out.push(DrawCommand::Line(crash_line(view))),
            }
        }
    }
    Some(out)
}
