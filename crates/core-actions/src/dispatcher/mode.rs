//! Normal <-> Selecting transitions. Entering or leaving Selecting does not
//! touch the selection itself: it survives a shift release until the next
//! Normal-mode motion or edit consumes or clears it.

use super::DispatchResult;
use crate::{InputState, KeyboardMode, ModeChange};
use tracing::debug;

pub(crate) fn handle_mode_change(change: ModeChange, state: &mut InputState) -> DispatchResult {
    let next = match change {
        ModeChange::ShiftPressed => KeyboardMode::Selecting,
        ModeChange::ShiftReleased => KeyboardMode::Normal,
    };
    if next == state.mode {
        return DispatchResult::clean();
    }
    debug!(target: "actions.mode", from = ?state.mode, to = ?next, "keyboard_mode");
    state.mode = next;
    DispatchResult {
        mode_changed: true,
        ..DispatchResult::clean()
    }
}
