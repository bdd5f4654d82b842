use crate::error::LoadError;
use std::str::Lines;

/// Line cursor with one line of lookahead, sections consume lines only
/// while they match their record pattern.
pub(crate) struct LineReader<'a> {
    lines: Lines<'a>,
    peeked: Option<&'a str>,
    line_no: usize,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        LineReader {
            lines: text.lines(),
            peeked: None,
            line_no: 0,
        }
    }

    /// 1-based number of the last consumed line.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peeked.take().or_else(|| self.lines.next())?;
        self.line_no += 1;
        Some(line)
    }

    pub fn peek(&mut self) -> Option<&'a str> {
        if self.peeked.is_none() {
            self.peeked = self.lines.next();
        }
        self.peeked
    }

    /// Consume the next line only if `f` accepts it.
    pub fn next_map<T>(&mut self, f: impl FnOnce(&'a str) -> Option<T>) -> Option<T> {
        let value = f(self.peek()?)?;
        self.next_line();
        Some(value)
    }

    /// Format error pointing at the last consumed line.
    pub fn error(&self, msg: impl std::fmt::Display) -> LoadError {
        LoadError::format(format!("line {}: {}", self.line_no, msg))
    }
}

/// Split `key|value`, the value being everything after the first `|`.
pub(crate) fn directive(line: &str) -> (&str, Option<&str>) {
    match line.split_once('|') {
        Some((key, value)) => (key, Some(value)),
        None => (line, None),
    }
}
