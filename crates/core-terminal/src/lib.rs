//! Terminal backend abstraction and crossterm implementation.
//!
//! Entering switches to raw mode and the alternate screen and, when the
//! terminal supports it, pushes keyboard enhancement flags so bare modifier
//! presses and key releases are reported. Leaving undoes all of it in
//! reverse order.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::{debug, warn};

pub mod capabilities;
pub use capabilities::TerminalCapabilities;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current size as (columns, rows).
    fn size(&self) -> Result<(u16, u16)>;
}

pub struct CrosstermBackend {
    entered: bool,
    enhanced_keys: bool,
    capabilities: TerminalCapabilities,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new(TerminalCapabilities::default())
    }
}

impl CrosstermBackend {
    pub fn new(capabilities: TerminalCapabilities) -> Self {
        Self {
            entered: false,
            enhanced_keys: false,
            capabilities,
        }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Show)?;
        self.entered = true;
        if self.capabilities.keyboard_enhancement {
            match execute!(stdout(), PushKeyboardEnhancementFlags(enhancement_flags())) {
                Ok(()) => self.enhanced_keys = true,
                Err(err) => warn!(target: "terminal", %err, "keyboard_enhancement_push_failed"),
            }
        }
        debug!(target: "terminal", enhanced_keys = self.enhanced_keys, "terminal_entered");
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        if self.enhanced_keys {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
            self.enhanced_keys = false;
        }
        execute!(stdout(), LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        self.entered = false;
        debug!(target: "terminal", "terminal_left");
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }
}

/// Kitty keyboard protocol flags pushed on enter.
///
/// A bare Shift press or release is only reported as a key when all keys are
/// sent as escape codes. Alternate keys make shifted printable keys arrive as
/// the shifted char (`A`, `!`) instead of the base key plus SHIFT.
fn enhancement_flags() -> KeyboardEnhancementFlags {
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
}

/// Best-effort terminal reset for panic hooks, where the guard's drop may
/// never run before the panic message is printed. Errors are ignored.
pub fn restore_after_panic() {
    let _ = execute!(stdout(), PopKeyboardEnhancementFlags, LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}
