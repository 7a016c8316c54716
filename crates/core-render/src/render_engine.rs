//! Render engine: executes scheduler decisions against the terminal.
//!
//! * `Full` clears the screen, paints every visible row (selected segments in
//!   reverse video) and places the hardware cursor.
//! * `CursorOnly` skips composition and only moves the hardware cursor.
//!
//! `plan` builds the writer without touching the terminal so tests can
//! inspect the exact command stream; `render` plans and flushes.

use crate::frame::{Frame, Margins, compose, cursor_cell};
use crate::scheduler::{Decision, RenderDelta};
use crate::writer::Writer;
use anyhow::Result;
use core_model::TextEditorModel;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::Instant;
use tracing::{debug, trace};

/// Executed-path counters, separate from the scheduler's semantic counters.
#[derive(Debug, Default)]
pub struct RenderPathMetrics {
    full_frames: AtomicU64,
    cursor_only_frames: AtomicU64,
    print_commands: AtomicU64,
    last_full_render_ns: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPathMetricsSnapshot {
    pub full_frames: u64,
    pub cursor_only_frames: u64,
    pub print_commands: u64,
    pub last_full_render_ns: u64,
}

impl RenderPathMetrics {
    pub fn snapshot(&self) -> RenderPathMetricsSnapshot {
        RenderPathMetricsSnapshot {
            full_frames: self.full_frames.load(Relaxed),
            cursor_only_frames: self.cursor_only_frames.load(Relaxed),
            print_commands: self.print_commands.load(Relaxed),
            last_full_render_ns: self.last_full_render_ns.load(Relaxed),
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderEngine {
    margins: Margins,
    metrics: RenderPathMetrics,
}

impl RenderEngine {
    pub fn new(margins: Margins) -> Self {
        Self {
            margins,
            metrics: RenderPathMetrics::default(),
        }
    }

    /// Replace the margins, e.g. after a resize re-clamped them.
    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    pub fn metrics_snapshot(&self) -> RenderPathMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Translate a decision into writer commands for a `width` x `height` terminal.
    pub fn plan(
        &self,
        model: &TextEditorModel,
        decision: Decision,
        width: u16,
        height: u16,
    ) -> Writer {
        let mut writer = Writer::new();
        match decision.effective {
            RenderDelta::CursorOnly => {
                place_cursor(&mut writer, cursor_cell(model, width, height, self.margins));
            }
            RenderDelta::Full | RenderDelta::Selection => {
                let frame = compose(model, width, height, self.margins);
                paint_frame(&mut writer, &frame);
            }
        }
        writer
    }

    /// Plan and flush to stdout.
    pub fn render(
        &mut self,
        model: &TextEditorModel,
        decision: Decision,
        width: u16,
        height: u16,
    ) -> Result<()> {
        let start = Instant::now();
        let writer = self.plan(model, decision, width, height);
        let prints = writer.flush()?;
        let ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.record(decision, prints, ns);
        trace!(target: "render", ?decision, prints, ns, "frame_rendered");
        Ok(())
    }

    fn record(&self, decision: Decision, prints: u64, ns: u64) {
        self.metrics.print_commands.fetch_add(prints, Relaxed);
        match decision.effective {
            RenderDelta::CursorOnly => {
                self.metrics.cursor_only_frames.fetch_add(1, Relaxed);
            }
            RenderDelta::Full | RenderDelta::Selection => {
                self.metrics.full_frames.fetch_add(1, Relaxed);
                self.metrics.last_full_render_ns.store(ns, Relaxed);
            }
        }
    }
}

fn paint_frame(writer: &mut Writer, frame: &Frame) {
    debug!(
        target: "render",
        rows = frame.rows.len(),
        width = frame.width,
        height = frame.height,
        "full_frame"
    );
    writer.hide_cursor();
    writer.clear_all();
    for row in &frame.rows {
        if row.segments.is_empty() {
            continue;
        }
        writer.move_to(frame.margins.left, row.y);
        for seg in &row.segments {
            if seg.selected {
                writer.print_selected(seg.text.as_str());
            } else {
                writer.print(seg.text.as_str());
            }
        }
    }
    place_cursor(writer, frame.cursor);
}

fn place_cursor(writer: &mut Writer, cell: Option<(u16, u16)>) {
    match cell {
        Some((x, y)) => {
            writer.move_to(x, y);
            writer.show_cursor();
        }
        None => writer.hide_cursor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Command;
    use pretty_assertions::assert_eq;

    #[test]
    fn cursor_only_plan_moves_cursor_without_printing() {
        let mut model = TextEditorModel::new("abc\ndef");
        model.move_cursor_down();
        let engine = RenderEngine::new(Margins { left: 2, top: 1 });
        let decision = Decision {
            semantic: RenderDelta::CursorOnly,
            effective: RenderDelta::CursorOnly,
        };
        let w = engine.plan(&model, decision, 80, 24);
        assert_eq!(
            w.commands(),
            &[Command::MoveTo(2, 2), Command::ShowCursor]
        );
    }

    #[test]
    fn full_plan_paints_rows_at_margins() {
        let model = TextEditorModel::new("ab\n\ncd");
        let engine = RenderEngine::new(Margins { left: 1, top: 0 });
        let w = engine.plan(&model, Decision::full(), 80, 24);
        assert_eq!(
            w.commands(),
            &[
                Command::HideCursor,
                Command::ClearAll,
                Command::MoveTo(1, 0),
                Command::Print("ab".into()),
                Command::MoveTo(1, 2),
                Command::Print("cd".into()),
                Command::MoveTo(1, 0),
                Command::ShowCursor,
            ]
        );
    }

    #[test]
    fn set_margins_shifts_the_next_plan() {
        let mut model = TextEditorModel::new("ab");
        model.move_cursor_right();
        let mut engine = RenderEngine::new(Margins::default());
        engine.set_margins(Margins { left: 3, top: 2 });
        let decision = Decision {
            semantic: RenderDelta::CursorOnly,
            effective: RenderDelta::CursorOnly,
        };
        let w = engine.plan(&model, decision, 80, 24);
        assert_eq!(
            w.commands(),
            &[Command::MoveTo(4, 2), Command::ShowCursor]
        );
    }

    #[test]
    fn cursor_outside_terminal_is_hidden() {
        let mut model = TextEditorModel::new("a\nb\nc");
        model.move_cursor_down();
        model.move_cursor_down();
        let engine = RenderEngine::new(Margins::default());
        let w = engine.plan(&model, Decision::full(), 10, 2);
        assert_eq!(w.commands().last(), Some(&Command::HideCursor));
    }

    #[test]
    fn record_splits_metrics_by_path() {
        let engine = RenderEngine::new(Margins::default());
        engine.record(Decision::full(), 3, 42);
        engine.record(
            Decision {
                semantic: RenderDelta::CursorOnly,
                effective: RenderDelta::CursorOnly,
            },
            0,
            1,
        );
        let snap = engine.metrics_snapshot();
        assert_eq!(snap.full_frames, 1);
        assert_eq!(snap.cursor_only_frames, 1);
        assert_eq!(snap.print_commands, 3);
        assert_eq!(snap.last_full_render_ns, 42);
    }
}
