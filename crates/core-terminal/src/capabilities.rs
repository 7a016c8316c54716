//! Terminal capability probing.
//!
//! Detection runs once at startup. The only capability the editor consults is
//! the keyboard enhancement protocol: with it the terminal reports bare Shift
//! presses and releases, so Selecting mode follows the physical key instead
//! of the SHIFT bit on the next key.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub keyboard_enhancement: bool,
}

impl TerminalCapabilities {
    /// Query the terminal. A failed query counts as unsupported.
    pub fn detect() -> Self {
        let keyboard_enhancement =
            crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        debug!(target: "terminal", keyboard_enhancement, "capabilities_detected");
        Self {
            keyboard_enhancement,
        }
    }
}
