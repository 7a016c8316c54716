//! Key → `Action` translation.
//!
//! Terminals without the kitty keyboard protocol never report a bare shift
//! press or release; they only set the SHIFT bit on the next key.
//! `shift_transition` turns that bit into the same mode changes a real shift
//! press/release produces. `handle_key` uses it only until the first bare
//! Shift event arrives.

use crate::{Action, EditKind, KeyboardMode, ModeChange, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Mode change implied by the SHIFT modifier of a non-shift key, if any.
pub fn shift_transition(mode: KeyboardMode, key: &KeyEvent) -> Option<ModeChange> {
    if key.code == KeyCode::Shift || !key.is_press() {
        return None;
    }
    let shifted = key.mods.contains(KeyModifiers::SHIFT);
    match (mode, shifted) {
        (KeyboardMode::Normal, true) => Some(ModeChange::ShiftPressed),
        (KeyboardMode::Selecting, false) => Some(ModeChange::ShiftReleased),
        _ => None,
    }
}

/// Translate a key in the given mode. Releases other than shift are ignored.
pub fn translate_key(mode: KeyboardMode, key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return match (key.code, mode) {
            (KeyCode::Shift, KeyboardMode::Selecting) => {
                Some(Action::ModeChange(ModeChange::ShiftReleased))
            }
            _ => None,
        };
    }
    let ctrl = key.mods.contains(KeyModifiers::CTRL);
    let action = match key.code {
        KeyCode::Shift => match mode {
            KeyboardMode::Normal => Action::ModeChange(ModeChange::ShiftPressed),
            KeyboardMode::Selecting => return None,
        },
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('q') if ctrl => Action::Quit,
        KeyCode::Char(_) if ctrl || key.mods.contains(KeyModifiers::ALT) => return None,
        KeyCode::Char(c) => Action::Edit(EditKind::InsertChar(c)),
        KeyCode::Enter => Action::Edit(EditKind::InsertNewline),
        KeyCode::Backspace => Action::Edit(EditKind::DeleteBefore),
        KeyCode::Delete => Action::Edit(EditKind::DeleteAfter),
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Up => Action::Motion(MotionKind::Up),
        KeyCode::Down => Action::Motion(MotionKind::Down),
        KeyCode::Tab => return None,
    };
    Some(action)
}
