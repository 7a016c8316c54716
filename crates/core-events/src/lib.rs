//! Core event types shared by the input task and the event loop.

use std::fmt;
use std::sync::atomic::AtomicU64;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// Single producer (input task) and single consumer (event loop) over a bounded tokio mpsc channel.
// The producer awaits `send` so key presses are never dropped; a closed channel ends the producer.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

// Relaxed counters, inspected by tests and logged at shutdown.
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static KEYRELEASE_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Ctrl-C surfaced distinctly so the loop can quit regardless of keyboard mode.
    CtrlC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub fn press(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            kind: KeyEventKind::Press,
        }
    }

    pub fn release(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            kind: KeyEventKind::Release,
        }
    }

    /// Unmodified press, the common case in tests.
    pub fn plain(code: KeyCode) -> Self {
        Self::press(code, KeyModifiers::empty())
    }

    pub fn shifted(code: KeyCode) -> Self {
        Self::press(code, KeyModifiers::SHIFT)
    }

    pub fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Press / release distinction. Release events only arrive from terminals
/// that support the keyboard enhancement protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    Press,
    Repeat,
    Release,
}

/// Logical keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    /// Bare shift key (left or right).
    Shift,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}{:?}", self.code, self.mods, self.kind)
    }
}
