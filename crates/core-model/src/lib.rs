//! Text buffer model: line storage, the cursor, the selection range and the
//! two observer channels.
//!
//! Core invariants (must hold after every public call):
//! * `lines` is never empty.
//! * `cursor.y < lines.len()` and `cursor.x <= char_len(lines[cursor.y])`.
//! * Both selection endpoints satisfy the same bounds when set through
//!   `set_selection_range`; mutations do not re-validate the stored selection,
//!   the presentation layer owns its lifecycle.
//!
//! Notification contract:
//! * `move_cursor_left` / `move_cursor_right` notify cursor observers even
//!   when the cursor cannot move.
//! * `move_cursor_up` / `move_cursor_down` notify only when a line exists in
//!   that direction.
//! * `delete_before` notifies cursor then text observers, including the no-op
//!   at the buffer origin.
//! * `delete_after` and `delete_range` notify text observers only, even when
//!   the cursor was repositioned by a single-line range delete.
//! * `insert_text` notifies cursor then text observers.
//!
//! Operations taking caller-supplied coordinates validate them first and
//! return a `ModelError` with the buffer untouched.

use core_text::{Location, LocationRange, byte_index, char_len, split_lines};
use std::fmt;
use tracing::{debug, trace};

mod error;
mod observer;

pub use error::ModelError;
pub use observer::{CursorObserver, ObserverId, TextObserver};
use observer::Registry;

pub struct TextEditorModel {
    lines: Vec<String>,
    cursor: Location,
    selection: LocationRange,
    cursor_observers: Registry<dyn CursorObserver>,
    text_observers: Registry<dyn TextObserver>,
    next_observer_id: u64,
}

impl fmt::Debug for TextEditorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEditorModel")
            .field("lines", &self.lines)
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("cursor_observers", &self.cursor_observers.len())
            .field("text_observers", &self.text_observers.len())
            .finish()
    }
}

impl TextEditorModel {
    /// Build a model from initial text; see `core_text::split_lines` for the
    /// line-boundary rules.
    pub fn new(initial_text: &str) -> Self {
        let lines = split_lines(initial_text);
        debug!(target: "model", line_count = lines.len(), "model_created");
        Self {
            lines,
            cursor: Location::origin(),
            selection: LocationRange::collapsed(Location::origin()),
            cursor_observers: Registry::default(),
            text_observers: Registry::default(),
            next_observer_id: 0,
        }
    }

    // ------------------------------------------------------------------ queries

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// Lines in the half-open span `[start, end)`.
    pub fn lines_range(&self, start: usize, end: usize) -> Result<&[String], ModelError> {
        if start > end || end > self.lines.len() {
            return Err(ModelError::InvalidLineSpan {
                start,
                end,
                line_count: self.lines.len(),
            });
        }
        Ok(&self.lines[start..end])
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Char length of line `y` (0 for a nonexistent line).
    pub fn line_len(&self, y: usize) -> usize {
        self.lines.get(y).map(|l| char_len(l)).unwrap_or(0)
    }

    pub fn cursor_location(&self) -> Location {
        self.cursor
    }

    pub fn selection_range(&self) -> LocationRange {
        self.selection
    }

    /// Whole buffer joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn contains(&self, location: Location) -> bool {
        location.y < self.lines.len() && location.x <= self.line_len(location.y)
    }

    // ------------------------------------------------------------------ cursor

    pub fn move_cursor_left(&mut self) {
        let Location { x, y } = self.cursor;
        if x > 0 {
            self.cursor.x = x - 1;
        } else if y > 0 {
            self.cursor = Location::new(self.line_len(y - 1), y - 1);
        }
        trace!(target: "model", op = "move_cursor_left", x = self.cursor.x, y = self.cursor.y);
        self.notify_cursor_observers();
    }

    pub fn move_cursor_right(&mut self) {
        let Location { x, y } = self.cursor;
        if x < self.line_len(y) {
            self.cursor.x = x + 1;
        } else if y + 1 < self.lines.len() {
            self.cursor = Location::new(0, y + 1);
        }
        trace!(target: "model", op = "move_cursor_right", x = self.cursor.x, y = self.cursor.y);
        self.notify_cursor_observers();
    }

    pub fn move_cursor_up(&mut self) {
        let y = self.cursor.y;
        if y == 0 {
            return;
        }
        self.move_vertically_to(y - 1, "move_cursor_up");
    }

    pub fn move_cursor_down(&mut self) {
        let y = self.cursor.y;
        if y + 1 >= self.lines.len() {
            return;
        }
        self.move_vertically_to(y + 1, "move_cursor_down");
    }

    /// Column-preserving vertical move, clamped to the end of a shorter target line.
    fn move_vertically_to(&mut self, target: usize, op: &'static str) {
        let len = self.line_len(target);
        if self.cursor.x > len {
            self.cursor.x = len;
        }
        self.cursor.y = target;
        trace!(target: "model", op, x = self.cursor.x, y = self.cursor.y);
        self.notify_cursor_observers();
    }

    /// Place the cursor explicitly. Notifies cursor observers on success.
    pub fn set_cursor_location(&mut self, location: Location) -> Result<(), ModelError> {
        if !self.contains(location) {
            debug!(target: "model", %location, "set_cursor_rejected");
            return Err(ModelError::InvalidCursorPosition {
                location,
                line_count: self.lines.len(),
            });
        }
        self.cursor = location;
        trace!(target: "model", op = "set_cursor_location", x = location.x, y = location.y);
        self.notify_cursor_observers();
        Ok(())
    }

    /// Store the active selection. Observers are not notified; the selection
    /// is presentation state mirrored into the model.
    pub fn set_selection_range(&mut self, range: LocationRange) -> Result<(), ModelError> {
        self.check_range(range)?;
        self.selection = range;
        Ok(())
    }

    // ------------------------------------------------------------------ edits

    /// Backspace: remove the char before the cursor, or join with the previous line at column 0.
    pub fn delete_before(&mut self) {
        let Location { x, y } = self.cursor;
        if x == 0 {
            if y > 0 {
                let line = self.lines.remove(y);
                let prev = &mut self.lines[y - 1];
                let prev_len = char_len(prev);
                prev.push_str(&line);
                self.cursor = Location::new(prev_len, y - 1);
            }
        } else {
            let line = &mut self.lines[y];
            let start = byte_index(line, x - 1);
            let end = byte_index(line, x);
            line.replace_range(start..end, "");
            self.cursor.x = x - 1;
        }
        debug!(target: "model", op = "delete_before", x = self.cursor.x, y = self.cursor.y);
        self.notify_cursor_observers();
        self.notify_text_observers();
    }

    /// Forward delete: remove the char at the cursor, or pull the next line up
    /// at end of line. The cursor does not move.
    pub fn delete_after(&mut self) {
        let Location { x, y } = self.cursor;
        if x >= self.line_len(y) {
            if y + 1 < self.lines.len() {
                let next = self.lines.remove(y + 1);
                self.lines[y].push_str(&next);
            }
        } else {
            let line = &mut self.lines[y];
            let start = byte_index(line, x);
            let end = byte_index(line, x + 1);
            line.replace_range(start..end, "");
        }
        debug!(target: "model", op = "delete_after", x, y, line_count = self.lines.len());
        self.notify_text_observers();
    }

    /// Remove the text between the two endpoints of `range` (either order).
    ///
    /// Single-line ranges move the cursor to the lower column on that line.
    /// Multi-line ranges leave the cursor where it was, pulled back inside the
    /// buffer if the removed lines took its old position away.
    pub fn delete_range(&mut self, range: LocationRange) -> Result<(), ModelError> {
        self.check_range(range)?;
        if range.is_single_line() {
            let y = range.start.y;
            let (lo, hi) = if range.start.x > range.end.x {
                (range.end.x, range.start.x)
            } else {
                (range.start.x, range.end.x)
            };
            let line = &mut self.lines[y];
            let start = byte_index(line, lo);
            let end = byte_index(line, hi);
            line.replace_range(start..end, "");
            self.cursor = Location::new(lo, y);
        } else {
            let (first, last) = range.normalized();
            let top = &self.lines[first.y];
            let prefix = &top[..byte_index(top, first.x)];
            let bottom = &self.lines[last.y];
            let suffix = &bottom[byte_index(bottom, last.x)..];
            let merged = format!("{prefix}{suffix}");
            self.lines
                .splice(first.y..=last.y, std::iter::once(merged));
            let lines = &self.lines;
            self.cursor
                .clamp_to(lines.len(), |y| char_len(&lines[y]));
        }
        debug!(
            target: "model",
            op = "delete_range",
            %range,
            x = self.cursor.x,
            y = self.cursor.y,
            line_count = self.lines.len()
        );
        self.notify_text_observers();
        Ok(())
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut buf));
    }

    /// Insert at the cursor; `\n`, `\r\n` and `\r` split lines. The cursor ends
    /// up after the inserted text. Empty input is ignored without notifying.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let Location { x, y } = self.cursor;
        let line = &mut self.lines[y];
        let tail = line.split_off(byte_index(line, x));
        let mut segments = normalized.split('\n');
        let first = segments.next().unwrap_or_default();
        line.push_str(first);
        let mut cursor = Location::new(x + char_len(first), y);
        let mut at = y;
        for segment in segments {
            at += 1;
            self.lines.insert(at, segment.to_string());
            cursor = Location::new(char_len(segment), at);
        }
        self.lines[at].push_str(&tail);
        self.cursor = cursor;
        debug!(
            target: "model",
            op = "insert_text",
            len = text.len(),
            x = cursor.x,
            y = cursor.y
        );
        self.notify_cursor_observers();
        self.notify_text_observers();
    }

    fn check_range(&self, range: LocationRange) -> Result<(), ModelError> {
        if self.contains(range.start) && self.contains(range.end) {
            Ok(())
        } else {
            debug!(target: "model", %range, "range_rejected");
            Err(ModelError::InvalidRange {
                range,
                line_count: self.lines.len(),
            })
        }
    }

    // ------------------------------------------------------------------ observers

    pub fn attach_cursor_observer(&mut self, observer: Box<dyn CursorObserver>) -> ObserverId {
        let id = self.allocate_observer_id();
        self.cursor_observers.push(id, observer);
        id
    }

    pub fn detach_cursor_observer(&mut self, id: ObserverId) -> bool {
        self.cursor_observers.remove(id)
    }

    pub fn attach_text_observer(&mut self, observer: Box<dyn TextObserver>) -> ObserverId {
        let id = self.allocate_observer_id();
        self.text_observers.push(id, observer);
        id
    }

    pub fn detach_text_observer(&mut self, id: ObserverId) -> bool {
        self.text_observers.remove(id)
    }

    fn allocate_observer_id(&mut self) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        id
    }

    fn notify_cursor_observers(&mut self) {
        let location = self.cursor;
        for observer in self.cursor_observers.iter_mut() {
            observer.on_cursor_moved(location);
        }
    }

    fn notify_text_observers(&mut self) {
        for observer in self.text_observers.iter_mut() {
            observer.on_text_changed();
        }
    }
}

impl<'a> IntoIterator for &'a TextEditorModel {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
