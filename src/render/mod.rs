pub mod annotate;
pub mod classify;
pub mod failure;
pub mod lines;
pub mod plain;
pub mod progress;
pub mod session;
pub mod summary;
pub mod terminal;
pub mod theme;
pub mod width;

use std::io;

use crate::events::Event;

/// Consumes lifecycle events in host order and paints them.
pub trait Reporter {
    fn handle(&mut self, event: &Event) -> io::Result<()>;

    /// Print the end-of-run summary.
    fn finish(&mut self) -> io::Result<RunOutcome>;
}

/// How the run ended, as far as the reporter saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub failed: bool,
    pub host_exit_status: Option<i32>,
}

impl RunOutcome {
    /// 1 when a failure was seen, else whatever non-zero status the host
    /// reported, else 0.
    pub fn exit_code(&self) -> i32 {
        if self.failed {
            return 1;
        }
        self.host_exit_status.filter(|s| *s != 0).unwrap_or(0)
    }
}

/// Rendering width: the override, else the live size of the terminal on
/// stdout, else `$COLUMNS`, else 80. Queried again on every call so resizes
/// are picked up.
pub fn terminal_width(width_override: Option<usize>) -> usize {
    if let Some(w) = width_override {
        return w;
    }
    let columns = std::env::var("COLUMNS").ok();
    resolve_width(width_override, live_width(), columns.as_deref())
}

fn live_width() -> Option<usize> {
    let term = console::Term::stdout();
    if !term.is_term() {
        return None;
    }
    term.size_checked().map(|(_rows, cols)| usize::from(cols))
}

fn resolve_width(
    width_override: Option<usize>,
    live: Option<usize>,
    columns: Option<&str>,
) -> usize {
    width_override
        .or(live.filter(|w| *w > 0))
        .or_else(|| {
            columns
                .and_then(|c| c.trim().parse::<usize>().ok())
                .filter(|w| *w > 0)
        })
        .unwrap_or(80)
}
