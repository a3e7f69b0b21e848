use std::collections::HashMap;
use std::time::Duration;

use indicatif::FormattedDuration;

use crate::events::{Phase, ResultEvent};
use crate::render::annotate::FailureAnnotator;
use crate::render::classify::{Classification, StatusCategory};
use crate::render::failure::{crash_line, FailureView};
use crate::render::theme::{Role, Theme};

const ALL_PHASES: &[Phase] = &[Phase::Setup, Phase::Call, Phase::Teardown];
const SETUP_TEARDOWN: &[Phase] = &[Phase::Setup, Phase::Teardown];

/// Per-category counts for the session, plus the call-phase failures the
/// summary lists by name.
#[derive(Debug, Default)]
pub struct Stats {
    counts: HashMap<(StatusCategory, Phase), usize>,
    failures: Vec<ResultEvent>,
    collection_errors: usize,
    deselected: usize,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a result. A strict unexpected pass is tallied as a failure.
    pub fn record(&mut self, classification: &Classification, report: &ResultEvent) {
        let bucket = match classification.category {
            StatusCategory::Xpassed if classification.fails_run => StatusCategory::Failed,
            other => other,
        };
        *self.counts.entry((bucket, report.when)).or_default() += 1;
        if bucket == StatusCategory::Failed && report.when == Phase::Call {
            self.failures.push(report.clone());
        }
    }

    pub fn record_collection_error(&mut self) {
        self.collection_errors += 1;
    }

    pub fn record_deselected(&mut self, count: usize) {
        self.deselected += count;
    }

    /// Results in `category` whose phase is one of `phases`.
    pub fn count(&self, category: StatusCategory, phases: &[Phase]) -> usize {
        phases
            .iter()
            .filter_map(|phase| self.counts.get(&(category, *phase)))
            .sum()
    }

    /// Call-phase failures in arrival order.
    pub fn failures(&self) -> impl Iterator<Item = &ResultEvent> {
        self.failures.iter()
    }

    /// Non-zero category counts in display order.
    pub fn tally(&self) -> Vec<(StatusCategory, usize)> {
        let errors = self.count(StatusCategory::Failed, SETUP_TEARDOWN) + self.collection_errors;
        [
            (StatusCategory::Passed, self.count(StatusCategory::Passed, &[Phase::Call])),
            (StatusCategory::Xpassed, self.count(StatusCategory::Xpassed, ALL_PHASES)),
            (StatusCategory::Failed, self.count(StatusCategory::Failed, &[Phase::Call])),
            (StatusCategory::Error, errors),
            (StatusCategory::Xfailed, self.count(StatusCategory::Xfailed, ALL_PHASES)),
            (StatusCategory::Skipped, self.count(StatusCategory::Skipped, ALL_PHASES)),
            (StatusCategory::Rerun, self.count(StatusCategory::Rerun, ALL_PHASES)),
            (StatusCategory::Deselected, self.deselected),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect()
    }

    /// Whether the run as a whole failed.
    pub fn run_failed(&self) -> bool {
        self.collection_errors > 0
            || self
                .counts
                .iter()
                .any(|((category, _), n)| *category == StatusCategory::Failed && *n > 0)
    }
}

/// Options for [`render_summary`].
pub struct SummaryOptions<'a> {
    /// Decoded crash lines instead of `dir/file:line name`.
    pub old_summary: bool,
    pub annotator: &'a dyn FailureAnnotator,
}

/// `0.42s`, or `75.00s (00:01:15)` from one minute on.
pub fn format_session_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        format!("{secs:.2}s ({})", FormattedDuration(duration))
    }
}

fn category_role(category: StatusCategory) -> Role {
    match category {
        StatusCategory::Passed => Role::Success,
        StatusCategory::Xpassed => Role::Xpassed,
        StatusCategory::Failed => Role::Fail,
        StatusCategory::Error => Role::Error,
        StatusCategory::Xfailed => Role::Xfailed,
        StatusCategory::Skipped => Role::Skipped,
        StatusCategory::Rerun => Role::Rerun,
        StatusCategory::Deselected => Role::Warning,
        StatusCategory::Unknown => Role::Unknown,
    }
}

/// Line number for the compact failure line: structured location, else the
/// reported 0-based line plus one, else `?`.
fn failure_lineno(report: &ResultEvent) -> String {
    report
        .crash
        .as_ref()
        .and_then(|c| c.lineno)
        .or_else(|| report.location.line.map(|l| l + 1))
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn compact_failure_line(report: &ResultEvent, theme: &Theme) -> String {
    let path = &report.location.path;
    let (dir, name) = match path.rfind('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path.as_str()),
    };
    format!(
        "{}{}{}:{} {}",
        theme.paint(dir, Role::Path),
        if dir.is_empty() { "" } else { "/" },
        theme.paint(name, Role::Name),
        failure_lineno(report),
        theme.paint(&report.location.name, Role::Fail),
    )
}

/// End-of-run tally, one line per non-zero category.
pub fn render_summary(
    stats: &Stats,
    duration: Duration,
    theme: &Theme,
    options: &SummaryOptions<'_>,
) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("Results ({}):", format_session_duration(duration)),
    ];

    for (category, count) in stats.tally() {
        let text = format!("   {:>5} {}", count, category.as_str());
        lines.push(theme.paint(&text, category_role(category)));

        if category != StatusCategory::Failed {
            continue;
        }
        for report in stats.failures() {
            let crash = if options.old_summary {
                crash_line(&FailureView::from(report))
            } else {
                compact_failure_line(report, theme)
            };
            lines.push(format!("         - {crash}"));
            if let Some(note) = options.annotator.annotate(report) {
                lines.push(format!("           - 🎭 {}", theme.paint(&note, Role::Warning)));
            }
        }
    }
    lines
}
