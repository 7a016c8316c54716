//! Style spans layered over composed text.
//!
//! Invariants:
//! * Spans are line-local (identified by buffer `line`). Horizontal ranges use
//!   half-open `[start_col, end_col)` semantics in display columns, before
//!   margins are applied.
//! * Callers compute columns with the same width rules as the cursor so a
//!   span never splits a glyph.
//! * Selection produces at most one span per line.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    Selection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleSpan {
    pub line: usize,
    pub start_col: u16, // inclusive
    pub end_col: u16,   // exclusive
    pub attr: StyleAttr,
}

impl StyleSpan {
    pub fn width(&self) -> u16 {
        self.end_col.saturating_sub(self.start_col)
    }
}

#[derive(Default, Debug)]
pub struct StyleLayer {
    pub spans: Vec<StyleSpan>,
}

impl StyleLayer {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }
    pub fn push(&mut self, span: StyleSpan) {
        self.spans.push(span);
    }
    /// Span covering `line`, if any.
    pub fn span_for_line(&self, line: usize) -> Option<&StyleSpan> {
        self.spans.iter().find(|s| s.line == line)
    }
}
