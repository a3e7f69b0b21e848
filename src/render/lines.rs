//! Per-key status lines and the cursor bookkeeping needed to rewrite them.
//!
//! Every tracked key (a file path, or a full test id in verbose mode) owns a
//! line of glyphs that was started on some physical row. Rows only ever grow
//! downwards, so a line's distance from the cursor is
//! `current_row - home_row`; redrawing moves up that many rows and back.

use std::collections::HashMap;

use crate::render::progress::PERCENTAGE_WIDTH;
use crate::render::terminal::DrawCommand;
use crate::render::theme::{Role, Theme};
use crate::render::width::{ellipsize_left, visible_width};

/// Columns kept free to the right of the progress bar.
pub const RIGHT_MARGIN: usize = 0;

/// Width facts for one layout decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub bar_width: usize,
    pub verbose: bool,
}

impl Layout {
    /// Columns available for the label and glyphs before the progress readout.
    pub fn status_columns(&self) -> usize {
        self.width
            .saturating_sub(PERCENTAGE_WIDTH + self.bar_width + RIGHT_MARGIN)
    }
}

/// What a line is announced with.
#[derive(Debug, Clone, Copy)]
pub struct LineLabel<'a> {
    pub path: &'a str,
    pub test_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLine {
    pub content: String,
    pub home_row: usize,
}

#[derive(Debug, Default)]
pub struct LineMultiplexer {
    lines: HashMap<String, TrackedLine>,
    current_row: usize,
}

impl LineMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn current_row(&self) -> usize {
        self.current_row
    }

    #[cfg(test)]
    pub fn line(&self, key: &str) -> Option<&TrackedLine> {
        self.lines.get(key)
    }

    /// Forget every tracked line. Used after something else has written
    /// over the layout.
    pub fn reset(&mut self) {
        tracing::debug!("resetting {} tracked lines", self.lines.len());
        self.lines.clear();
        self.current_row = 0;
    }

    /// Account for a row written outside any tracked line.
    pub fn advance_row(&mut self) {
        self.current_row += 1;
    }

    pub fn begin_new_line(
        &mut self,
        key: &str,
        label: LineLabel<'_>,
        print_label: bool,
        layout: &Layout,
        theme: &Theme,
        out: &mut Vec<DrawCommand>,
    ) {
        self.current_row += 1;

        let max = layout.status_columns();
        let path = ellipsize_left(label.path, max.saturating_sub(5), max.saturating_sub(10));

        let announced = if layout.verbose {
            format!(
                " {}::{} ",
                theme.paint(&path, Role::Path),
                theme.paint(label.test_name, Role::Name)
            )
        } else {
            let (dir, base) = match path.rfind('/') {
                Some(i) => path.split_at(i + 1),
                None => ("", path.as_str()),
            };
            format!(
                " {}{} ",
                theme.paint(dir, Role::Path),
                theme.paint(base, Role::Name)
            )
        };
        let content = if print_label {
            announced
        } else {
            " ".repeat(visible_width(&announced))
        };

        tracing::debug!(
            "line for {} opened at row {} (label: {})",
            key,
            self.current_row,
            print_label
        );
        self.lines.insert(
            key.to_string(),
            TrackedLine {
                content,
                home_row: self.current_row,
            },
        );
        out.push(DrawCommand::NewLine);
    }

    /// Add a glyph to the key's line, opening a new line first when the key
    /// has none or its line is full. A continuation line repeats the label
    /// only if some other line was started after this one.
    pub fn append_glyph(
        &mut self,
        key: &str,
        label: LineLabel<'_>,
        glyph: &str,
        layout: &Layout,
        theme: &Theme,
        out: &mut Vec<DrawCommand>,
    ) {
        let reopen = match self.lines.get(key) {
            None => Some(true),
            Some(line) if visible_width(&line.content) >= layout.status_columns() => {
                Some(line.home_row != self.current_row)
            }
            Some(_) => None,
        };
        if let Some(print_label) = reopen {
            self.begin_new_line(key, label, print_label, layout, theme, out);
        }
        if let Some(line) = self.lines.get_mut(key) {
            line.content.push_str(glyph);
        }
    }

    /// Rewrite the key's row with its glyphs and the right-aligned progress
    /// readout. An untracked key draws on the cursor's row.
    pub fn redraw_progress(
        &self,
        key: &str,
        readout: &str,
        layout: &Layout,
        out: &mut Vec<DrawCommand>,
    ) {
        let (content, home_row) = match self.lines.get(key) {
            Some(line) => (line.content.as_str(), line.home_row),
            None => ("", self.current_row),
        };
        let padding = layout
            .width
            .saturating_sub(visible_width(content) + visible_width(readout) + RIGHT_MARGIN);
        let line = format!("{content}{}{readout}", " ".repeat(padding));
        out.push(DrawCommand::Overwrite {
            rows_up: self.current_row.saturating_sub(home_row),
            line,
        });
    }
}
