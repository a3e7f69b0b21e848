use std::collections::HashSet;
use std::ops::Range;

use crate::render::theme::{paint, Role, Theme};

/// Columns taken by the `NN% ` readout in front of the bar.
pub const PERCENTAGE_WIDTH: usize = 5;

/// Sub-cell fill resolution: the partial cell at the head of the bar is
/// drawn in one of 15 steps, mapped onto the eighth-block glyphs.
pub const FILL_STEPS: usize = 15;

const FILL_GLYPHS: [char; FILL_STEPS + 1] = [
    ' ', '▏', '▏', '▎', '▎', '▍', '▍', '▌', '▌', '▋', '▋', '▊', '▊', '▉', '▉', '█',
];

/// One bar cell that some completion landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub index: usize,
    pub success: bool,
}

/// A run of bar cells drawn in one color role. `role` is `None` before the
/// first recorded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub cells: Range<usize>,
    pub role: Option<Role>,
}

/// Expected and completed test counts plus the per-cell success record.
#[derive(Debug, Default, Clone)]
pub struct ProgressState {
    expected: usize,
    completed: usize,
    blocks: Vec<Block>,
    workers: HashSet<String>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn expected(&self) -> usize {
        self.expected
    }

    #[cfg(test)]
    pub fn completed(&self) -> usize {
        self.completed
    }

    #[cfg(test)]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Collection finished on a single process: the count replaces any
    /// earlier one.
    pub fn set_expected(&mut self, count: usize) {
        self.expected = count.max(self.completed);
        tracing::debug!("expecting {} tests", self.expected);
    }

    /// A distributed worker finished collecting. Counts from distinct
    /// workers are summed; a repeated notification from the same worker is
    /// ignored.
    pub fn add_worker_expected(&mut self, worker: &str, count: usize) {
        if !self.workers.insert(worker.to_string()) {
            tracing::debug!("duplicate collection count from worker {}", worker);
            return;
        }
        self.expected += count;
        tracing::debug!("worker {} adds {} tests, expecting {}", worker, count, self.expected);
    }

    /// Items were deselected after collection. Never drops below zero nor
    /// below the number already completed.
    pub fn deselect(&mut self, count: usize) {
        if self.expected == 0 {
            return;
        }
        self.expected = self.expected.saturating_sub(count).max(self.completed);
        tracing::debug!("deselected {}, expecting {}", count, self.expected);
    }

    /// Bar cell the next completion lands on.
    pub fn block_index(&self, bar_width: usize) -> usize {
        if self.expected == 0 || bar_width == 0 {
            return 0;
        }
        (self.completed * bar_width / self.expected).min(bar_width - 1)
    }

    /// One more test finished. A failure turns its cell red for good.
    pub fn record_completion(&mut self, failed: bool, bar_width: usize) {
        let index = self.block_index(bar_width);
        self.completed += 1;
        if self.completed > self.expected {
            tracing::debug!(
                "completed {} exceeds expected {}, raising expectation",
                self.completed,
                self.expected
            );
            self.expected = self.completed;
        }

        match self.blocks.last_mut() {
            Some(last) if last.index == index => {
                if failed {
                    last.success = false;
                }
            }
            _ => self.blocks.push(Block {
                index,
                success: !failed,
            }),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.blocks.iter().any(|b| !b.success)
    }

    fn fraction(&self) -> f64 {
        if self.expected == 0 {
            return 0.0;
        }
        self.completed as f64 / self.expected as f64
    }

    /// Whole percent done, floored. Shows 100 only once every expected test
    /// has completed.
    pub fn percentage(&self) -> usize {
        if self.expected == 0 {
            return 0;
        }
        let pct = self.completed * 100 / self.expected;
        if pct >= 100 && self.completed < self.expected {
            99
        } else {
            pct.min(100)
        }
    }

    /// Unstyled bar cells: full blocks, one partial cell, then spaces.
    pub fn bar_cells(&self, bar_width: usize) -> Vec<char> {
        let scaled = self.fraction() * bar_width as f64;
        let full = (scaled.floor() as usize).min(bar_width);
        let step = ((scaled - full as f64) * FILL_STEPS as f64).round() as usize;

        let mut cells = vec![FILL_GLYPHS[FILL_STEPS]; full];
        if step > 0 && full < bar_width {
            cells.push(FILL_GLYPHS[step.min(FILL_STEPS)]);
        }
        cells.resize(bar_width, ' ');
        cells
    }

    /// Color runs over the bar. Cells between recorded blocks take the
    /// color of the block before them.
    pub fn segments(&self, bar_width: usize) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut next = 0;
        let mut last_role = None;

        for block in self.blocks.iter().filter(|b| b.index < bar_width) {
            let role = if block.success {
                Role::ProgressBar
            } else {
                Role::ProgressBarFail
            };
            if next < block.index {
                segments.push(Segment {
                    cells: next..block.index,
                    role: last_role,
                });
            }
            segments.push(Segment {
                cells: block.index..block.index + 1,
                role: Some(role),
            });
            next = block.index + 1;
            last_role = Some(role);
        }

        if next < bar_width {
            segments.push(Segment {
                cells: next..bar_width,
                role: last_role,
            });
        }
        segments
    }

    /// `NN% ` followed by the colored bar. Empty when the bar has no width.
    pub fn render(&self, theme: &Theme, bar_width: usize) -> String {
        if bar_width == 0 {
            return String::new();
        }

        let readout = format!("{}% ", self.percentage());
        let readout_role = if self.has_failures() {
            Role::Fail
        } else {
            Role::Success
        };
        let mut out = theme.paint(&readout, readout_role);

        let cells = self.bar_cells(bar_width);
        let background = theme.color(Role::ProgressBarBackground);
        for segment in self.segments(bar_width) {
            let text: String = cells[segment.cells.clone()].iter().collect();
            let fg = segment.role.and_then(|r| theme.color(r));
            out.push_str(&paint(&text, fg, background));
        }
        out
    }
}
