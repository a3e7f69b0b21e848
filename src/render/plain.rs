//! Sequential fallback used when stdout is not a terminal: one line per
//! result, no cursor movement, no color.

use std::io::{self, Write};
use std::time::Instant;

use crate::events::{Event, Outcome, Phase};
use crate::render::classify::classify_event;
use crate::render::failure::{print_failure, FailureView, TracebackStyle};
use crate::render::summary::{format_session_duration, Stats};
use crate::render::terminal::{DrawCommand, Terminal};
use crate::render::{Reporter, RunOutcome};

pub struct PlainReporter<W: Write> {
    terminal: Terminal<W>,
    tb_style: TracebackStyle,
    width: usize,
    stats: Stats,
    started: Instant,
    host_exit_status: Option<i32>,
}

impl<W: Write> PlainReporter<W> {
    pub fn new(out: W, tb_style: TracebackStyle, width: usize) -> Self {
        Self {
            terminal: Terminal::new(out),
            tb_style,
            width,
            stats: Stats::new(),
            started: Instant::now(),
            host_exit_status: None,
        }
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.terminal.into_inner()
    }
}

impl<W: Write> Reporter for PlainReporter<W> {
    fn handle(&mut self, event: &Event) -> io::Result<()> {
        let mut out = Vec::new();
        match event {
            Event::SessionStart { header } => {
                self.started = Instant::now();
                out.push(DrawCommand::Line(format!(
                    "Test session starts (platform: {}, sugar {})",
                    std::env::consts::OS,
                    env!("CARGO_PKG_VERSION")
                )));
                out.extend(header.iter().cloned().map(DrawCommand::Line));
            }
            Event::CollectReport(report) if report.outcome == Outcome::Failed => {
                self.stats.record_collection_error();
                if let Some(block) = print_failure(&FailureView::from(report), self.tb_style, self.width) {
                    out.extend(block);
                }
            }
            Event::Deselected { items } => self.stats.record_deselected(items.len()),
            Event::TestReport(report) => {
                let classification = classify_event(report);
                self.stats.record(&classification, report);
                if report.when == Phase::Call
                    || matches!(report.outcome, Outcome::Skipped | Outcome::Failed)
                {
                    out.push(DrawCommand::Line(format!(
                        "{} {}",
                        report.nodeid, classification.label
                    )));
                }
                if report.outcome == Outcome::Failed {
                    if let Some(block) =
                        print_failure(&FailureView::from(report), self.tb_style, self.width)
                    {
                        out.extend(block);
                    }
                }
            }
            Event::SessionFinish { exit_status } => self.host_exit_status = *exit_status,
            Event::CollectReport(_)
            | Event::CollectionFinish { .. }
            | Event::WorkerCollectionFinished { .. } => {}
        }
        self.terminal.apply(&out)
    }

    fn finish(&mut self) -> io::Result<RunOutcome> {
        let parts: Vec<String> = self
            .stats
            .tally()
            .into_iter()
            .map(|(category, count)| format!("{count} {}", category.as_str()))
            .collect();
        let tally = if parts.is_empty() {
            "no tests ran".to_string()
        } else {
            parts.join(", ")
        };
        let line = format!(
            "{tally} in {}",
            format_session_duration(self.started.elapsed())
        );
        self.terminal.apply(&[DrawCommand::Line(line)])?;
        Ok(RunOutcome {
            failed: self.stats.run_failed(),
            host_exit_status: self.host_exit_status,
        })
    }
}
