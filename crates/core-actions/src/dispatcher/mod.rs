//! Dispatcher applying `Action` to the text model and the keyboard state.
//!
//! Sub-modules:
//! * `motion` - arrow keys, with or without selection extension
//! * `mode`   - Normal <-> Selecting transitions
//! * `edit`   - deletes and insertion, selection-aware
//!
//! After every action the live selection is mirrored into the model
//! (`TextEditorModel::set_selection_range`), collapsed at the cursor when
//! nothing is selected.

use crate::{Action, InputState};
use core_model::TextEditorModel;
use core_text::LocationRange;
use tracing::warn;

mod edit;
mod mode;
mod motion;

/// Result of dispatching a single `Action`.
///
/// Model observers already announce cursor and text changes;
/// `selection_changed` covers highlight changes the model cannot see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    pub selection_changed: bool,
    pub mode_changed: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }
    pub fn absorb(&mut self, other: DispatchResult) {
        self.selection_changed |= other.selection_changed;
        self.mode_changed |= other.mode_changed;
        self.quit |= other.quit;
    }
}

/// Apply an action to the model and the keyboard state.
pub fn dispatch(
    action: Action,
    model: &mut TextEditorModel,
    state: &mut InputState,
) -> DispatchResult {
    let before = state.selection;
    let mut result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, model, state),
        Action::Edit(kind) => edit::handle_edit(kind, model, state),
        Action::ModeChange(change) => mode::handle_mode_change(change, state),
        Action::Quit => return DispatchResult::quit(),
    };
    result.selection_changed |= state.selection != before;
    mirror_selection(model, state);
    result
}

fn mirror_selection(model: &mut TextEditorModel, state: &mut InputState) {
    let collapsed = LocationRange::collapsed(model.cursor_location());
    let range = state.selection.unwrap_or(collapsed);
    if let Err(err) = model.set_selection_range(range) {
        // A stale selection can only come from an edit path that forgot to
        // reset it; drop it rather than render garbage.
        warn!(target: "actions.dispatch", %err, "selection_dropped");
        state.selection = None;
        // The cursor is always inside the buffer, so this cannot fail short
        // of a broken model invariant.
        if let Err(err) = model.set_selection_range(collapsed) {
            warn!(target: "actions.dispatch", %err, "selection_reset_rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditKind, KeyboardMode, ModeChange, MotionKind};
    use core_text::Location;

    #[test]
    fn quit_short_circuits() {
        let mut model = TextEditorModel::new("abc");
        let mut state = InputState::new();
        let r = dispatch(Action::Quit, &mut model, &mut state);
        assert!(r.quit);
        assert_eq!(model.lines(), ["abc"]);
    }

    #[test]
    fn model_selection_tracks_cursor_when_nothing_selected() {
        let mut model = TextEditorModel::new("abc");
        let mut state = InputState::new();
        dispatch(Action::Motion(MotionKind::Right), &mut model, &mut state);
        assert_eq!(
            model.selection_range(),
            LocationRange::collapsed(Location::new(1, 0))
        );
    }

    #[test]
    fn selection_change_is_reported() {
        let mut model = TextEditorModel::new("abc");
        let mut state = InputState {
            mode: KeyboardMode::Selecting,
            selection: None,
            bare_shift: false,
        };
        let r = dispatch(Action::Motion(MotionKind::Right), &mut model, &mut state);
        assert!(r.selection_changed);
        assert_eq!(
            model.selection_range(),
            LocationRange::new(Location::new(0, 0), Location::new(1, 0))
        );
        let r = dispatch(
            Action::Edit(EditKind::DeleteAfter),
            &mut model,
            &mut state,
        );
        assert!(r.selection_changed);
        assert_eq!(model.lines(), ["bc"]);
    }

    #[test]
    fn stale_selection_is_dropped_and_model_collapses_at_cursor() {
        let mut model = TextEditorModel::new("ab");
        let mut state = InputState {
            mode: KeyboardMode::Normal,
            selection: Some(LocationRange::new(
                Location::new(0, 0),
                Location::new(9, 4),
            )),
            bare_shift: false,
        };
        dispatch(
            Action::ModeChange(ModeChange::ShiftPressed),
            &mut model,
            &mut state,
        );
        assert_eq!(state.selection, None);
        assert_eq!(
            model.selection_range(),
            LocationRange::collapsed(Location::new(0, 0))
        );
    }
}
