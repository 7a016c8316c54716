//! Keyboard-driven selection scenarios run through the full
//! `handle_key` pipeline (shift synthesis, translation, dispatch).

use core_actions::{InputState, KeyboardMode, handle_key};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_model::TextEditorModel;
use core_text::{Location, LocationRange};
use pretty_assertions::assert_eq;

fn feed(model: &mut TextEditorModel, state: &mut InputState, keys: &[KeyEvent]) -> bool {
    let mut quit = false;
    for key in keys {
        quit |= handle_key(key, model, state).quit;
    }
    quit
}

fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::plain(code)
}

fn shifted(code: KeyCode) -> KeyEvent {
    KeyEvent::shifted(code)
}

#[test]
fn shift_arrows_select_and_delete_removes_selection() {
    let mut model = TextEditorModel::new("abc");
    let mut state = InputState::new();
    feed(
        &mut model,
        &mut state,
        &[shifted(KeyCode::Right), shifted(KeyCode::Right)],
    );
    assert_eq!(state.mode, KeyboardMode::Selecting);
    assert_eq!(
        state.selection,
        Some(LocationRange::new(Location::new(0, 0), Location::new(2, 0)))
    );

    feed(&mut model, &mut state, &[shifted(KeyCode::Delete)]);
    assert_eq!(model.lines(), ["c"]);
    assert_eq!(model.cursor_location(), Location::new(0, 0));
    // Still selecting: the selection re-anchors, empty, at the cursor.
    assert_eq!(
        state.selection,
        Some(LocationRange::collapsed(Location::new(0, 0)))
    );
}

#[test]
fn backward_selection_is_replaced_by_typed_char() {
    let mut model = TextEditorModel::new("hello world");
    let mut state = InputState::new();
    let mut keys = vec![plain(KeyCode::Right); 5];
    keys.extend(std::iter::repeat_n(shifted(KeyCode::Left), 5));
    feed(&mut model, &mut state, &keys);
    assert_eq!(
        model.selection_range(),
        LocationRange::new(Location::new(5, 0), Location::new(0, 0))
    );

    feed(&mut model, &mut state, &[plain(KeyCode::Char('X'))]);
    assert_eq!(state.mode, KeyboardMode::Normal);
    assert_eq!(model.lines(), ["X world"]);
    assert_eq!(model.cursor_location(), Location::new(1, 0));
    assert_eq!(state.selection, None);
}

#[test]
fn multi_line_selection_deleted_with_backspace() {
    let mut model = TextEditorModel::new("ab\ncd");
    let mut state = InputState::new();
    feed(
        &mut model,
        &mut state,
        &[
            plain(KeyCode::Right),
            shifted(KeyCode::Down),
            shifted(KeyCode::Backspace),
        ],
    );
    assert_eq!(model.lines(), ["ad"]);
    assert_eq!(model.cursor_location(), Location::new(1, 0));
}

#[test]
fn plain_arrow_after_selection_clears_it() {
    let mut model = TextEditorModel::new("abc");
    let mut state = InputState::new();
    feed(
        &mut model,
        &mut state,
        &[shifted(KeyCode::Right), plain(KeyCode::Right)],
    );
    assert_eq!(state.mode, KeyboardMode::Normal);
    assert_eq!(state.selection, None);
    assert_eq!(model.cursor_location(), Location::new(2, 0));
    assert_eq!(
        model.selection_range(),
        LocationRange::collapsed(Location::new(2, 0))
    );
}

#[test]
fn selection_survives_shift_release_until_consumed() {
    let mut model = TextEditorModel::new("abcd");
    let mut state = InputState::new();
    feed(
        &mut model,
        &mut state,
        &[
            KeyEvent::press(KeyCode::Shift, KeyModifiers::SHIFT),
            shifted(KeyCode::Right),
            shifted(KeyCode::Right),
            KeyEvent::release(KeyCode::Shift, KeyModifiers::empty()),
        ],
    );
    assert_eq!(state.mode, KeyboardMode::Normal);
    assert_eq!(
        state.selection,
        Some(LocationRange::new(Location::new(0, 0), Location::new(2, 0)))
    );

    // Normal-mode delete consumes the leftover selection.
    feed(&mut model, &mut state, &[plain(KeyCode::Delete)]);
    assert_eq!(model.lines(), ["cd"]);
    assert_eq!(state.selection, None);
}

#[test]
fn delete_without_selection_in_selecting_mode_falls_back() {
    let mut model = TextEditorModel::new("abc");
    let mut state = InputState::new();
    feed(
        &mut model,
        &mut state,
        &[
            KeyEvent::press(KeyCode::Shift, KeyModifiers::SHIFT),
            shifted(KeyCode::Delete),
        ],
    );
    assert_eq!(model.lines(), ["bc"]);
    assert_eq!(model.cursor_location(), Location::new(0, 0));
}

#[test]
fn enter_splits_line_and_typing_continues_on_next() {
    let mut model = TextEditorModel::new("ab");
    let mut state = InputState::new();
    feed(
        &mut model,
        &mut state,
        &[
            plain(KeyCode::Right),
            plain(KeyCode::Enter),
            plain(KeyCode::Char('x')),
        ],
    );
    assert_eq!(model.lines(), ["a", "xb"]);
    assert_eq!(model.cursor_location(), Location::new(1, 1));
}

#[test]
fn escape_and_ctrl_q_quit_without_editing() {
    let mut model = TextEditorModel::new("abc");
    let mut state = InputState::new();
    assert!(feed(&mut model, &mut state, &[plain(KeyCode::Esc)]));
    assert!(feed(
        &mut model,
        &mut state,
        &[KeyEvent::press(KeyCode::Char('q'), KeyModifiers::CTRL)]
    ));
    assert_eq!(model.lines(), ["abc"]);
}

#[test]
fn shifted_char_inserts_and_keeps_selecting_mode() {
    let mut model = TextEditorModel::new("");
    let mut state = InputState::new();
    feed(&mut model, &mut state, &[shifted(KeyCode::Char('A'))]);
    assert_eq!(model.lines(), ["A"]);
    assert_eq!(state.mode, KeyboardMode::Selecting);
    assert_eq!(state.selection, None);
}

#[test]
fn deletes_after_selection_delete_keep_removing_chars() {
    let mut model = TextEditorModel::new("abcdef");
    let mut state = InputState::new();
    let mut keys = vec![plain(KeyCode::Right); 3];
    keys.push(shifted(KeyCode::Left));
    feed(&mut model, &mut state, &keys);

    feed(&mut model, &mut state, &[shifted(KeyCode::Backspace)]);
    assert_eq!(model.lines(), ["abdef"]);
    assert_eq!(
        state.selection,
        Some(LocationRange::collapsed(Location::new(2, 0)))
    );

    // The re-anchored selection is empty, so the next deletes act on chars.
    feed(&mut model, &mut state, &[shifted(KeyCode::Backspace)]);
    assert_eq!(model.lines(), ["adef"]);
    assert_eq!(model.cursor_location(), Location::new(1, 0));

    feed(&mut model, &mut state, &[plain(KeyCode::Backspace)]);
    assert_eq!(state.mode, KeyboardMode::Normal);
    assert_eq!(model.lines(), ["def"]);
    assert_eq!(model.cursor_location(), Location::new(0, 0));
    assert_eq!(state.selection, None);
}

#[test]
fn forward_delete_with_empty_selection_removes_char() {
    let mut model = TextEditorModel::new("xyz");
    let mut state = InputState::new();
    state.mode = KeyboardMode::Selecting;
    state.selection = Some(LocationRange::collapsed(Location::new(0, 0)));
    feed(&mut model, &mut state, &[shifted(KeyCode::Delete)]);
    assert_eq!(model.lines(), ["yz"]);
}

#[test]
fn reported_shift_key_drives_mode_over_modifier_bits() {
    let mut model = TextEditorModel::new("ab");
    let mut state = InputState::new();
    feed(
        &mut model,
        &mut state,
        &[
            KeyEvent::press(KeyCode::Shift, KeyModifiers::SHIFT),
            shifted(KeyCode::Right),
            // Alternate-key reporting delivers the shifted char without SHIFT.
            plain(KeyCode::Char('A')),
        ],
    );
    assert!(state.bare_shift);
    assert_eq!(state.mode, KeyboardMode::Selecting);
    assert_eq!(model.lines(), ["Ab"]);

    feed(&mut model, &mut state, &[shifted(KeyCode::Right)]);
    assert_eq!(
        state.selection,
        Some(LocationRange::new(Location::new(1, 0), Location::new(2, 0)))
    );

    feed(
        &mut model,
        &mut state,
        &[KeyEvent::release(KeyCode::Shift, KeyModifiers::empty())],
    );
    assert_eq!(state.mode, KeyboardMode::Normal);
}
