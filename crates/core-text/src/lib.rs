//! Text coordinates and line helpers shared by the model and the presentation layer.
//!
//! Coordinates count `char`s (Unicode scalar values), never bytes, so no
//! location can point inside a UTF-8 sequence. Grapheme clustering is out of
//! scope: a combining mark is its own column for cursor purposes.

use std::cmp::Ordering;
use std::fmt;

use unicode_width::UnicodeWidthChar;

/// A position inside a buffer expressed as (char offset within the line, line index).
///
/// `x == line length` is valid and means "after the last character".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub x: usize,
    pub y: usize,
}

impl Location {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Pull the location back inside `line_count` lines whose lengths are
    /// reported by `line_len_fn`.
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.x = 0;
            self.y = 0;
            return;
        }
        if self.y >= line_count {
            self.y = line_count - 1;
        }
        let max_len = line_len_fn(self.y);
        if self.x > max_len {
            self.x = max_len;
        }
    }
}

impl Ord for Location {
    /// Document order: line first, then column.
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An unordered pair of locations: a selection (anchor = `start`, live end =
/// `end`) or a deletion span. `start` may sort after `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LocationRange {
    pub start: Location,
    pub end: Location,
}

impl LocationRange {
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Degenerate range with both endpoints at `at`.
    pub const fn collapsed(at: Location) -> Self {
        Self { start: at, end: at }
    }

    /// Endpoints in document order `(first, last)`.
    pub fn normalized(&self) -> (Location, Location) {
        if self.start > self.end {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.y == self.end.y
    }
}

impl fmt::Display for LocationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Split text into lines on `\n`, `\r\n` or a lone `\r`.
///
/// A trailing terminator does not open an extra empty line, and the result is
/// never empty: `""` yields a single empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Number of chars in `line` (the maximum valid `x` on that line).
pub fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Byte offset of the char at column `x`; `line.len()` when `x` is at or past the end.
pub fn byte_index(line: &str, x: usize) -> usize {
    line.char_indices()
        .nth(x)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

/// Terminal cells occupied by the first `x` chars of `line`.
pub fn display_col(line: &str, x: usize) -> usize {
    line.chars()
        .take(x)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Terminal cells occupied by the whole line.
pub fn display_width(line: &str) -> usize {
    line.chars().map(|c| c.width().unwrap_or(0)).sum()
}
