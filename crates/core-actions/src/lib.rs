//! Presentation-layer key handling: the Normal / Selecting keyboard state
//! machine, key translation, and dispatch of the resulting actions into the
//! text model.
//!
//! The model knows nothing about selections driven by the keyboard; this
//! crate owns the live selection and mirrors it into the model after every
//! dispatched action so renderers can read it from a single place.

use core_events::{KeyCode, KeyEvent};
use core_model::TextEditorModel;
use core_text::LocationRange;
use tracing::debug;

pub mod dispatcher;
mod key_translator;

pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::{shift_transition, translate_key};

/// Which keyboard handler is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardMode {
    /// Plain navigation and editing; arrows drop any selection.
    #[default]
    Normal,
    /// Shift is held; arrows extend the selection.
    Selecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Backspace.
    DeleteBefore,
    /// Forward delete.
    DeleteAfter,
    InsertChar(char),
    InsertNewline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    ShiftPressed,
    ShiftReleased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    Edit(EditKind),
    ModeChange(ModeChange),
    Quit,
}

/// Keyboard mode plus the selection it drives.
///
/// `selection` is `None` when nothing is selected. When present, `start` is
/// the anchor and `end` a copy of the cursor taken after the last motion.
///
/// `bare_shift` flips on the first Shift key event. From then on the terminal
/// reports Shift itself and the SHIFT bit of other keys no longer drives the
/// mode: with alternate keys reported, `A` arrives without that bit.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mode: KeyboardMode,
    pub selection: Option<LocationRange>,
    pub bare_shift: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Full key pipeline: synthesize shift transitions from the modifier bits
/// (until the terminal reports Shift as a key), translate, then dispatch.
/// Results of the individual steps are merged.
pub fn handle_key(
    key: &KeyEvent,
    model: &mut TextEditorModel,
    state: &mut InputState,
) -> DispatchResult {
    let mut result = DispatchResult::clean();
    if key.code == KeyCode::Shift && !state.bare_shift {
        debug!(target: "actions.mode", "bare_shift_reported");
        state.bare_shift = true;
    }
    if !state.bare_shift
        && let Some(change) = shift_transition(state.mode, key)
    {
        result.absorb(dispatch(Action::ModeChange(change), model, state));
    }
    if let Some(action) = translate_key(state.mode, key) {
        result.absorb(dispatch(action, model, state));
    }
    result
}
