//! Rendering: invalidation scheduling, frame composition and terminal emission.
//!
//! Pipeline:
//! 1. Model observers (`repaint`) record `RenderDelta`s in a shared
//!    `RenderScheduler` while the model mutates. The event loop marks
//!    `Selection` itself when only the highlight changed.
//! 2. The loop calls `consume` once per batch of input and hands the
//!    `Decision` to `RenderEngine`.
//! 3. Full paths compose a `Frame` (text clipped to the terminal, selection
//!    split into highlighted segments, hardware cursor cell) and translate it
//!    into `Writer` commands; cursor-only paths just move the cursor.
//!
//! Geometry:
//! - Text starts at `Margins { left, top }`.
//! - Columns are display columns (`unicode-width`), so the cursor of a line
//!   containing wide glyphs lands after the glyphs, not after N chars.
//! - Lines or columns past the terminal edge are clipped, never wrapped.

pub mod frame;
pub mod render_engine;
pub mod repaint;
pub mod scheduler;
pub mod style;
pub mod writer;

pub use frame::{Frame, FrameRow, Margins, Segment, compose, selection_spans};
pub use render_engine::{RenderEngine, RenderPathMetricsSnapshot};
pub use repaint::{CursorRepaint, RenderObservers, SharedScheduler, TextRepaint, attach_render_observers};
pub use scheduler::{Decision, RenderDelta, RenderScheduler};
