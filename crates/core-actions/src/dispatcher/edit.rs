//! Text mutation routed through the current selection.
//!
//! * Normal mode deletes a non-empty selection (then clears it), otherwise
//!   falls back to single-char deletes.
//! * Selecting mode deletes a non-empty selection and re-anchors an empty
//!   selection at the resulting cursor. An empty or missing selection falls
//!   back to single-char deletes, so repeated deletes keep removing text.
//! * Insertion replaces a non-empty selection first and always clears it.

use super::DispatchResult;
use crate::{EditKind, InputState, KeyboardMode};
use core_model::TextEditorModel;
use core_text::LocationRange;
use tracing::{trace, warn};

pub(crate) fn handle_edit(
    kind: EditKind,
    model: &mut TextEditorModel,
    state: &mut InputState,
) -> DispatchResult {
    trace!(target: "actions.edit", ?kind, mode = ?state.mode, "edit");
    match kind {
        EditKind::DeleteBefore | EditKind::DeleteAfter => {
            match state.selection.filter(|s| !s.is_empty()) {
                Some(selection) => delete_selection(model, selection),
                None if kind == EditKind::DeleteBefore => model.delete_before(),
                None => model.delete_after(),
            }
            state.selection = match state.mode {
                KeyboardMode::Normal => None,
                KeyboardMode::Selecting => {
                    Some(LocationRange::collapsed(model.cursor_location()))
                }
            };
        }
        EditKind::InsertChar(c) => {
            replace_selection(model, state);
            model.insert_char(c);
        }
        EditKind::InsertNewline => {
            replace_selection(model, state);
            model.insert_char('\n');
        }
    }
    DispatchResult::clean()
}

fn replace_selection(model: &mut TextEditorModel, state: &mut InputState) {
    if let Some(selection) = state.selection.take()
        && !selection.is_empty()
    {
        delete_selection(model, selection);
    }
}

fn delete_selection(model: &mut TextEditorModel, selection: LocationRange) {
    if let Err(err) = model.delete_range(selection) {
        warn!(target: "actions.edit", %err, "selection_delete_rejected");
    }
}
