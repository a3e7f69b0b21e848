//! Ingestion boundary: the host test engine's lifecycle notifications.
//!
//! The host writes one JSON object per line. Each line becomes one [`Event`];
//! nothing past this module looks at the wire shape.

use std::io::BufRead;

use serde::Deserialize;

use crate::error::SugarError;

/// One lifecycle notification from the host.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SessionStart {
        #[serde(default)]
        header: Vec<String>,
    },
    CollectReport(CollectReport),
    CollectionFinish {
        count: usize,
    },
    WorkerCollectionFinished {
        worker: String,
        count: usize,
    },
    Deselected {
        #[serde(default)]
        items: Vec<String>,
    },
    TestReport(ResultEvent),
    SessionFinish {
        #[serde(default)]
        exit_status: Option<i32>,
    },
}

/// Sub-step of running a single test.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
    Collect,
}

/// Raw outcome as reported by the host.
/// Unknown values deserialize to `Unknown` for forward-compatibility.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    Rerun,
    #[serde(other)]
    Unknown,
}

/// Where a test lives: file path, optional 0-based line, display name.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Location {
    pub path: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub name: String,
}

/// Structured failure location (the innermost frame that raised).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CrashLocation {
    pub path: String,
    #[serde(default)]
    pub lineno: Option<u32>,
    #[serde(default)]
    pub message: String,
}

/// Result of one phase of one test.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResultEvent {
    pub nodeid: String,
    pub location: Location,
    pub when: Phase,
    pub outcome: Outcome,
    /// The test carries an expected-failure annotation.
    #[serde(default)]
    pub xfail: bool,
    /// The expected-failure annotation is strict.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub duration: f64,
    /// Full failure text, when the phase failed.
    #[serde(default)]
    pub longrepr: Option<String>,
    #[serde(default)]
    pub crash: Option<CrashLocation>,
    /// Distributed worker id, e.g. `gw0`.
    #[serde(default)]
    pub worker: Option<String>,
}

impl ResultEvent {
    /// Display name used in failure headers, e.g. `TestAnimals.test_cat`.
    pub fn headline(&self) -> String {
        if self.location.name.is_empty() {
            self.nodeid.clone()
        } else {
            self.location.name.clone()
        }
    }
}

/// Outcome of collecting one file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CollectReport {
    pub path: String,
    pub outcome: Outcome,
    #[serde(default)]
    pub longrepr: Option<String>,
    #[serde(default)]
    pub crash: Option<CrashLocation>,
}

/// Parse one line of the event stream. Blank lines yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Event>, SugarError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| SugarError::Event {
            line: line_no,
            source,
        })
}

/// Iterate events from a reader. Malformed lines are logged and skipped;
/// read errors end the stream with an error.
pub fn read_events<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Event, SugarError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Err(e) => Some(Err(SugarError::Io(e))),
            Ok(text) => match parse_line(idx + 1, &text) {
                Ok(event) => event.map(Ok),
                Err(e) => {
                    tracing::warn!("skipping event: {}", e);
                    None
                }
            },
        })
}
