//! The line buffer: pending input lines and emitted output lines.
//!
//! Input is a work queue. The driver pops one line per step; rules may look
//! ahead a bounded number of lines, remove lines ahead of the cursor, or push
//! new lines onto the front so they are processed next. Nothing is ever
//! inserted behind the cursor, so indices already consumed never shift.

use std::collections::VecDeque;
use std::ops::Range;

// ---------------------------------------------------------------------------
// LineQueue
// ---------------------------------------------------------------------------

/// Lines still waiting to be processed, front first.
#[derive(Debug, Default)]
pub(crate) struct LineQueue {
    lines: VecDeque<String>,
}

impl LineQueue {
    pub(crate) fn new(lines: Vec<String>) -> Self {
        Self {
            lines: lines.into(),
        }
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    /// The line `offset` positions ahead of the cursor (0 = next).
    pub(crate) fn peek(&self, offset: usize) -> Option<&str> {
        self.lines.get(offset).map(String::as_str)
    }

    /// The next `n` lines, fewer near the end of the document.
    pub(crate) fn window(&self, n: usize) -> impl Iterator<Item = &str> {
        self.lines.iter().take(n).map(String::as_str)
    }

    /// Offset of the first line in `window` (offsets ahead of the cursor)
    /// matching `pred`. The window is cut short at the end of the document.
    pub(crate) fn find_within(
        &self,
        window: Range<usize>,
        pred: impl Fn(&str) -> bool,
    ) -> Option<usize> {
        let start = window.start;
        self.window(window.end)
            .skip(start)
            .position(pred)
            .map(|offset| offset + start)
    }

    /// Remove the line at `offset`, if there is one.
    pub(crate) fn remove(&mut self, offset: usize) -> Option<String> {
        self.lines.remove(offset)
    }

    /// Drop the next `count` lines (fewer if the queue is shorter).
    pub(crate) fn discard(&mut self, count: usize) {
        let count = count.min(self.lines.len());
        self.lines.drain(..count);
    }

    /// Put a line back so it is the next one popped.
    pub(crate) fn push_front(&mut self, line: String) {
        self.lines.push_front(line);
    }

    /// Insert `lines` ahead of everything else, keeping their order.
    pub(crate) fn splice_front(&mut self, lines: Vec<String>) {
        for line in lines.into_iter().rev() {
            self.lines.push_front(line);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Converted lines, in document order.
#[derive(Debug, Default)]
pub(crate) struct Output {
    lines: Vec<String>,
}

impl Output {
    pub(crate) fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub(crate) fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    /// Take back the most recently emitted line.
    pub(crate) fn retract_last(&mut self) -> Option<String> {
        self.lines.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
