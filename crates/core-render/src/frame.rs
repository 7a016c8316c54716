//! Frame composition from the model: visible rows split into plain and
//! selected segments, plus the terminal cell of the cursor.

use crate::style::{StyleAttr, StyleLayer, StyleSpan};
use core_model::TextEditorModel;
use core_text::{LocationRange, display_col, display_width};
use unicode_width::UnicodeWidthChar;

/// Offset of the text area from the terminal's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
    pub left: u16,
    pub top: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub selected: bool,
}

/// One visible buffer line placed at terminal row `y`, starting at the left margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRow {
    pub y: u16,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub margins: Margins,
    pub rows: Vec<FrameRow>,
    /// Terminal cell of the cursor; `None` when it falls outside the terminal.
    pub cursor: Option<(u16, u16)>,
}

/// Highlight spans for `range` over `lines`: the first line from the start
/// column to its end, middle lines whole, the last line up to the end
/// column. Empty ranges and zero-width pieces produce no spans.
pub fn selection_spans<S: AsRef<str>>(lines: &[S], range: LocationRange) -> StyleLayer {
    let mut layer = StyleLayer::new();
    if range.is_empty() {
        return layer;
    }
    let (first, last) = range.normalized();
    for y in first.y..=last.y.min(lines.len().saturating_sub(1)) {
        let line = lines[y].as_ref();
        let start = if y == first.y {
            display_col(line, first.x)
        } else {
            0
        };
        let end = if y == last.y {
            display_col(line, last.x)
        } else {
            display_width(line)
        };
        if end > start {
            layer.push(StyleSpan {
                line: y,
                start_col: to_col(start),
                end_col: to_col(end),
                attr: StyleAttr::Selection,
            });
        }
    }
    layer
}

/// Cursor cell for the model under the given geometry.
pub fn cursor_cell(
    model: &TextEditorModel,
    width: u16,
    height: u16,
    margins: Margins,
) -> Option<(u16, u16)> {
    let cursor = model.cursor_location();
    let line = model.lines().get(cursor.y)?;
    let x = usize::from(margins.left) + display_col(line, cursor.x);
    let y = usize::from(margins.top) + cursor.y;
    if x < usize::from(width) && y < usize::from(height) {
        Some((to_col(x), to_col(y)))
    } else {
        None
    }
}

/// Compose the visible frame for a `width` x `height` terminal.
pub fn compose(model: &TextEditorModel, width: u16, height: u16, margins: Margins) -> Frame {
    let spans = selection_spans(model.lines(), model.selection_range());
    let visible_cols = usize::from(width.saturating_sub(margins.left));
    let mut rows = Vec::new();
    for (i, line) in model.iter().enumerate() {
        let y = usize::from(margins.top) + i;
        if y >= usize::from(height) {
            break;
        }
        let clipped = &line[..byte_at_col(line, visible_cols)];
        let segments = split_segments(clipped, spans.span_for_line(i));
        rows.push(FrameRow {
            y: to_col(y),
            segments,
        });
    }
    Frame {
        width,
        height,
        margins,
        rows,
        cursor: cursor_cell(model, width, height, margins),
    }
}

fn split_segments(text: &str, span: Option<&StyleSpan>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(3);
    let mut push = |piece: &str, selected: bool| {
        if !piece.is_empty() {
            out.push(Segment {
                text: piece.to_string(),
                selected,
            });
        }
    };
    match span {
        Some(span) => {
            let a = byte_at_col(text, usize::from(span.start_col));
            let b = byte_at_col(text, usize::from(span.end_col));
            push(&text[..a], false);
            push(&text[a..b], true);
            push(&text[b..], false);
        }
        None => push(text, false),
    }
    out
}

/// Byte offset of the last glyph boundary at or before display column `col`.
fn byte_at_col(line: &str, col: usize) -> usize {
    let mut acc = 0usize;
    for (i, c) in line.char_indices() {
        let w = c.width().unwrap_or(0);
        if acc >= col || acc + w > col {
            return i;
        }
        acc += w;
    }
    line.len()
}

fn to_col(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Location;
    use pretty_assertions::assert_eq;

    fn range(sx: usize, sy: usize, ex: usize, ey: usize) -> LocationRange {
        LocationRange::new(Location::new(sx, sy), Location::new(ex, ey))
    }

    #[test]
    fn byte_at_col_respects_wide_glyphs() {
        assert_eq!(byte_at_col("a界b", 0), 0);
        assert_eq!(byte_at_col("a界b", 1), 1);
        // Column 2 falls inside the wide glyph: stop before it.
        assert_eq!(byte_at_col("a界b", 2), 1);
        assert_eq!(byte_at_col("a界b", 3), 4);
        assert_eq!(byte_at_col("a界b", 10), 5);
    }

    #[test]
    fn spans_cover_first_middle_last() {
        let lines = ["abcd", "ef", "ghij"];
        let layer = selection_spans(&lines, range(3, 2, 1, 0));
        let cols: Vec<_> = layer
            .spans
            .iter()
            .map(|s| (s.line, s.start_col, s.end_col))
            .collect();
        assert_eq!(cols, vec![(0, 1, 4), (1, 0, 2), (2, 0, 3)]);
    }

    #[test]
    fn empty_selection_has_no_spans() {
        let layer = selection_spans(&["abc"], LocationRange::collapsed(Location::new(1, 0)));
        assert!(layer.spans.is_empty());
    }

    #[test]
    fn selection_ending_at_column_zero_skips_last_line() {
        let layer = selection_spans(&["ab", "cd"], range(1, 0, 0, 1));
        assert_eq!(layer.spans.len(), 1);
        assert_eq!(layer.spans[0].line, 0);
    }

    #[test]
    fn segments_split_around_span() {
        let span = StyleSpan {
            line: 0,
            start_col: 1,
            end_col: 3,
            attr: StyleAttr::Selection,
        };
        let segs = split_segments("abcd", Some(&span));
        let flat: Vec<_> = segs.iter().map(|s| (s.text.as_str(), s.selected)).collect();
        assert_eq!(flat, vec![("a", false), ("bc", true), ("d", false)]);
    }
}
