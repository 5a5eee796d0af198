//! Multi-line query input for the interactive loop

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

pub const PROMPT: &str = "SQL> ";
pub const CONTINUATION_PROMPT: &str = "  -> ";

/// Result of feeding one line to a [`QueryBuffer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// More lines are needed
    Pending,
    /// A query was completed
    Complete(String),
    /// `\c` on an empty buffer: re-enter the connection details
    Reconnect,
    /// `\q` on an empty buffer
    Quit,
}

/// Accumulates lines until a query is complete
///
/// A query ends with a line whose last non-blank character is `;`, or with
/// an empty line. Blank lines before the first line of a query are ignored.
#[derive(Debug, Default)]
pub struct QueryBuffer {
    lines: Vec<String>,
}

impl QueryBuffer {
    pub fn push_line(&mut self, line: &str) -> LineOutcome {
        let trimmed = line.trim();

        if self.lines.is_empty() {
            match trimmed {
                "" => return LineOutcome::Pending,
                "\\q" => return LineOutcome::Quit,
                "\\c" => return LineOutcome::Reconnect,
                _ => {}
            }
        } else if trimmed.is_empty() {
            return LineOutcome::Complete(self.take());
        }

        self.lines.push(line.trim_end().to_string());
        if trimmed.ends_with(';') {
            LineOutcome::Complete(self.take())
        } else {
            LineOutcome::Pending
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn take(&mut self) -> String {
        let query = self.lines.join("\n");
        self.lines.clear();
        query
    }
}

/// What the interactive loop should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Query(String),
    Reconnect,
    Quit,
}

/// Line editor with history, reading one query at a time
pub struct QueryReader {
    editor: DefaultEditor,
    buffer: QueryBuffer,
}

impl QueryReader {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            buffer: QueryBuffer::default(),
        })
    }

    /// Reads until a query is complete; EOF quits, Ctrl-C drops the pending lines
    pub fn read(&mut self) -> anyhow::Result<Input> {
        loop {
            let prompt = if self.buffer.is_empty() {
                PROMPT
            } else {
                CONTINUATION_PROMPT
            };

            match self.editor.readline(prompt) {
                Ok(line) => match self.buffer.push_line(&line) {
                    LineOutcome::Pending => {}
                    LineOutcome::Complete(query) => {
                        if let Err(e) = self.editor.add_history_entry(query.as_str()) {
                            tracing::debug!(error = %e, "history entry not recorded");
                        }
                        return Ok(Input::Query(query));
                    }
                    LineOutcome::Reconnect => return Ok(Input::Reconnect),
                    LineOutcome::Quit => return Ok(Input::Quit),
                },
                Err(ReadlineError::Interrupted) => self.buffer.clear(),
                Err(ReadlineError::Eof) => return Ok(Input::Quit),
                Err(e) => return Err(e.into()),
            }
        }
    }
}
