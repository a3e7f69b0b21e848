//! Extra notes attached to failures in the session summary.

use std::path::{Path, PathBuf};

use crate::events::ResultEvent;

/// Looks up something worth showing next to a failed test, such as a
/// recorded artifact.
pub trait FailureAnnotator {
    fn annotate(&self, report: &ResultEvent) -> Option<String>;
}

/// Annotator that never adds anything.
pub struct NoAnnotations;

impl FailureAnnotator for NoAnnotations {
    fn annotate(&self, _report: &ResultEvent) -> Option<String> {
        None
    }
}

/// Points at a browser trace archive recorded for the test, if one exists
/// at `<root>/<trace_dir>/<mangled nodeid>/trace.zip`.
pub struct TraceArtifactAnnotator {
    root: PathBuf,
    trace_dir: PathBuf,
}

impl TraceArtifactAnnotator {
    pub fn new(root: impl Into<PathBuf>, trace_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            trace_dir: trace_dir.into(),
        }
    }

    /// Directory name a trace recorder derives from a test id.
    pub fn trace_dir_name(nodeid: &str) -> String {
        nodeid
            .replace(['/', '\\'], "-")
            .replace("::", "-")
            .replace('[', "-")
            .replace(']', "")
            .replace(['_', '.'], "-")
            .to_lowercase()
    }

    fn trace_file(&self, nodeid: &str) -> PathBuf {
        self.root
            .join(&self.trace_dir)
            .join(Self::trace_dir_name(nodeid))
            .join("trace.zip")
    }
}

impl FailureAnnotator for TraceArtifactAnnotator {
    fn annotate(&self, report: &ResultEvent) -> Option<String> {
        let file = self.trace_file(&report.nodeid);
        if !file.is_file() {
            return None;
        }
        let shown = relative_to(&file, &self.root);
        tracing::debug!("found trace for {}: {}", report.nodeid, shown);
        Some(format!("playwright show-trace {shown}"))
    }
}

fn relative_to(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
