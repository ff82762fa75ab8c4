//! Indentation-tracking text writer for generated TypeScript.

use std::fmt;

/// One indentation level.
const INDENT: &str = "  ";

/// Buffers generated source and indents it by brace depth.
///
/// Indentation is driven by each completed line: a line starting with `}`
/// closes a level before it is printed, a line ending with `{` opens one
/// after. Blank lines carry no indentation.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    pending: String,
    depth: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_line(&mut self) {
        let line = std::mem::take(&mut self.pending);
        if line.starts_with('}') {
            self.depth = self.depth.saturating_sub(1);
        }
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(&line);
        }
        self.out.push('\n');
        if line.ends_with('{') {
            self.depth += 1;
        }
    }

    /// Consume the printer, returning everything written so far.
    pub fn finish(mut self) -> String {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.out.push_str(&rest);
        }
        self.out
    }
}

impl fmt::Write for Printer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.pending.push_str(first);
        }
        for line in lines {
            self.flush_line();
            self.pending.push_str(line);
        }
        Ok(())
    }
}
