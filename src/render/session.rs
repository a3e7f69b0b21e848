//! Session-scoped rendering context: everything one run needs, threaded
//! through every event instead of living in globals.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::io::{self, Write};
use std::time::Instant;

use colored::Colorize;

use crate::config::BarLength;
use crate::events::{CollectReport, Event, Outcome, Phase, ResultEvent};
use crate::render::annotate::{FailureAnnotator, NoAnnotations};
use crate::render::classify::classify_event;
use crate::render::failure::{print_failure, FailureView, TracebackStyle};
use crate::render::lines::{Layout, LineLabel, LineMultiplexer};
use crate::render::progress::ProgressState;
use crate::render::summary::{render_summary, Stats, SummaryOptions};
use crate::render::terminal::{DrawCommand, Terminal};
use crate::render::theme::Theme;
use crate::render::{terminal_width, Reporter, RunOutcome};

/// Settings fixed for the whole run.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// One line per test instead of one per file.
    pub verbose: bool,
    pub tb_style: TracebackStyle,
    pub old_summary: bool,
    pub bar_length: BarLength,
    /// Fixed terminal width; otherwise `$COLUMNS` is read at every layout.
    pub width: Option<usize>,
}

/// The rich reporter: per-file glyph lines, progress bar, instant failures.
pub struct SugarSession<W: Write> {
    options: SessionOptions,
    theme: Theme,
    annotator: Box<dyn FailureAnnotator>,
    progress: ProgressState,
    lines: LineMultiplexer,
    stats: Stats,
    terminal: Terminal<W>,
    bar_width: OnceCell<usize>,
    /// Tests with a failing phase whose completion is still pending.
    failing: HashSet<String>,
    started: Instant,
    host_exit_status: Option<i32>,
}

impl<W: Write> SugarSession<W> {
    pub fn new(options: SessionOptions, theme: Theme, out: W) -> Self {
        Self {
            options,
            theme,
            annotator: Box::new(NoAnnotations),
            progress: ProgressState::new(),
            lines: LineMultiplexer::new(),
            stats: Stats::new(),
            terminal: Terminal::new(out),
            bar_width: OnceCell::new(),
            failing: HashSet::new(),
            started: Instant::now(),
            host_exit_status: None,
        }
    }

    pub fn with_annotator(mut self, annotator: Box<dyn FailureAnnotator>) -> Self {
        self.annotator = annotator;
        self
    }

    #[cfg(test)]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    #[cfg(test)]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[cfg(test)]
    pub fn lines(&self) -> &LineMultiplexer {
        &self.lines
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.terminal.into_inner()
    }

    fn width(&self) -> usize {
        terminal_width(self.options.width)
    }

    /// Bar length is resolved against the width seen on first use and kept.
    fn bar_width(&self) -> usize {
        let width = self.width();
        *self
            .bar_width
            .get_or_init(|| self.options.bar_length.resolve(width))
    }

    fn layout(&self) -> Layout {
        Layout {
            width: self.width(),
            bar_width: self.bar_width(),
            verbose: self.options.verbose,
        }
    }

    fn line_key<'a>(&self, report: &'a ResultEvent) -> &'a str {
        if self.options.verbose {
            &report.nodeid
        } else {
            &report.location.path
        }
    }

    fn on_session_start(&mut self, header: &[String]) -> io::Result<()> {
        self.started = Instant::now();
        let title = format!(
            "Test session starts (platform: {}, sugar {})",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION")
        );
        let mut out = vec![DrawCommand::Line(title.bold().to_string())];
        out.extend(header.iter().cloned().map(DrawCommand::Line));
        self.terminal.apply(&out)
    }

    fn on_collect_report(&mut self, report: &CollectReport) -> io::Result<()> {
        if report.outcome != Outcome::Failed {
            return Ok(());
        }
        self.stats.record_collection_error();
        let view = FailureView::from(report);
        if let Some(out) = print_failure(&view, self.options.tb_style, self.width()) {
            self.terminal.apply(&out)?;
            self.lines.reset();
        }
        Ok(())
    }

    fn on_test_report(&mut self, report: &ResultEvent) -> io::Result<()> {
        let classification = classify_event(report);
        self.stats.record(&classification, report);
        if classification.fails_run {
            self.failing.insert(report.nodeid.clone());
        }

        let mut out = Vec::new();

        if report.outcome == Outcome::Failed {
            let view = FailureView::from(report);
            if let Some(block) = print_failure(&view, self.options.tb_style, self.width()) {
                out.push(DrawCommand::NewLine);
                out.extend(block);
                self.terminal.apply(&out)?;
                out.clear();
                self.lines.reset();
            }
        }

        let layout = self.layout();
        let key = self.line_key(report);

        if report.when == Phase::Call
            || report.outcome == Outcome::Skipped
            || report.outcome == Outcome::Failed
        {
            let label = LineLabel {
                path: &report.location.path,
                test_name: &report.location.name,
            };
            let glyph = classification.styled_glyph(&self.theme);
            self.lines
                .append_glyph(key, label, &glyph, &layout, &self.theme, &mut out);

            let worker = report.worker.as_deref().filter(|_| self.options.verbose);
            if let Some(worker) = worker {
                let word = self.theme.paint(classification.label, classification.role);
                out.push(DrawCommand::NewLine);
                out.push(DrawCommand::Overwrite {
                    rows_up: 0,
                    line: format!("[{worker}] {word} {}", report.nodeid),
                });
                self.lines.advance_row();
            }
        }

        if report.when == Phase::Teardown {
            let failed = self.failing.remove(&report.nodeid);
            self.progress.record_completion(failed, layout.bar_width);
            let readout = self.progress.render(&self.theme, layout.bar_width);
            self.lines.redraw_progress(key, &readout, &layout, &mut out);
        }

        self.terminal.apply(&out)
    }
}

impl<W: Write> Reporter for SugarSession<W> {
    fn handle(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::SessionStart { header } => self.on_session_start(header),
            Event::CollectReport(report) => self.on_collect_report(report),
            Event::CollectionFinish { count } => {
                self.progress.set_expected(*count);
                Ok(())
            }
            Event::WorkerCollectionFinished { worker, count } => {
                self.progress.add_worker_expected(worker, *count);
                Ok(())
            }
            Event::Deselected { items } => {
                self.progress.deselect(items.len());
                self.stats.record_deselected(items.len());
                Ok(())
            }
            Event::TestReport(report) => self.on_test_report(report),
            Event::SessionFinish { exit_status } => {
                self.host_exit_status = *exit_status;
                Ok(())
            }
        }
    }

    fn finish(&mut self) -> io::Result<RunOutcome> {
        let summary = render_summary(
            &self.stats,
            self.started.elapsed(),
            &self.theme,
            &SummaryOptions {
                old_summary: self.options.old_summary,
                annotator: self.annotator.as_ref(),
            },
        );
        let out: Vec<DrawCommand> = summary.into_iter().map(DrawCommand::Line).collect();
        self.terminal.apply(&out)?;
        Ok(RunOutcome {
            failed: self.stats.run_failed(),
            host_exit_status: self.host_exit_status,
        })
    }
}
