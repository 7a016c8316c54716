//! Arrow handling.
//!
//! Normal: move and drop the selection.
//! Selecting: anchor a selection at the cursor if none exists, move, then
//! copy the new cursor into the selection end. The end is always a fresh
//! copy, never a live alias of the model's cursor.

use super::DispatchResult;
use crate::{InputState, KeyboardMode, MotionKind};
use core_model::TextEditorModel;
use core_text::LocationRange;
use tracing::trace;

pub(crate) fn handle_motion(
    kind: MotionKind,
    model: &mut TextEditorModel,
    state: &mut InputState,
) -> DispatchResult {
    match state.mode {
        KeyboardMode::Normal => {
            apply_motion(kind, model);
            state.selection = None;
        }
        KeyboardMode::Selecting => {
            let mut selection = state
                .selection
                .unwrap_or_else(|| LocationRange::collapsed(model.cursor_location()));
            apply_motion(kind, model);
            selection.end = model.cursor_location();
            state.selection = Some(selection);
        }
    }
    trace!(target: "actions.motion", ?kind, mode = ?state.mode, "motion");
    DispatchResult::clean()
}

fn apply_motion(kind: MotionKind, model: &mut TextEditorModel) {
    match kind {
        MotionKind::Left => model.move_cursor_left(),
        MotionKind::Right => model.move_cursor_right(),
        MotionKind::Up => model.move_cursor_up(),
        MotionKind::Down => model.move_cursor_down(),
    }
}
