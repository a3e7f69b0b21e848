use std::io::{self, Write};

/// One side effect on the output stream. Layout code produces these; only
/// [`Terminal::apply`] turns them into bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Move to the start of a fresh row.
    NewLine,
    /// Rewrite the row `rows_up` rows above the cursor, then return to the
    /// cursor's row.
    Overwrite { rows_up: usize, line: String },
    /// A whole line of text, terminated.
    Line(String),
}

/// Executes draw commands against a writer. Write errors propagate.
pub struct Terminal<W: Write> {
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn apply(&mut self, commands: &[DrawCommand]) -> io::Result<()> {
        for command in commands {
            match command {
                DrawCommand::NewLine => self.out.write_all(b"\r\n")?,
                DrawCommand::Overwrite { rows_up, line } => {
                    if *rows_up > 0 {
                        write!(self.out, "\x1b[{rows_up}A")?;
                    }
                    write!(self.out, "\r{line}")?;
                    if *rows_up > 0 {
                        write!(self.out, "\x1b[{rows_up}B")?;
                    }
                }
                DrawCommand::Line(text) => writeln!(self.out, "{text}")?,
            }
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
