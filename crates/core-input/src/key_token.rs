use core_events::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers, ModifierKeyCode,
};

/// Map a crossterm key event into the editor's normalized key event.
///
/// Returns `None` for keys the editor does not react to (function keys,
/// media keys, modifiers other than shift).
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    let code = map_key_code(&event.code)?;
    let kind = match event.kind {
        CKeyEventKind::Press => KeyEventKind::Press,
        CKeyEventKind::Repeat => KeyEventKind::Repeat,
        CKeyEventKind::Release => KeyEventKind::Release,
    };
    Some(KeyEvent {
        code,
        mods: map_mods(event.modifiers),
        kind,
    })
}

fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let mapped = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            KeyCode::Shift
        }
        _ => return None,
    };
    Some(mapped)
}

pub(crate) fn map_mods(m: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
