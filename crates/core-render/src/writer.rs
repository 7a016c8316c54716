//! Terminal writer: an ordered list of primitive commands flushed in one go.
//!
//! Invariants:
//! * Commands preserve ordering; nothing reaches the terminal before `flush`.
//! * All positions are absolute (0,0) origin; the caller ensures bounds.
//! * Reverse video never leaks: every `PrintSelected` resets it afterwards.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearAll,
    Print(String),
    /// Text printed in reverse video (selection highlight).
    PrintSelected(String),
    ShowCursor,
    HideCursor,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn print_selected<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::PrintSelected(s));
        }
    }
    pub fn show_cursor(&mut self) {
        self.cmds.push(Command::ShowCursor);
    }
    pub fn hide_cursor(&mut self) {
        self.cmds.push(Command::HideCursor);
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Emit to stdout. Returns the number of print commands written.
    pub fn flush(self) -> Result<u64> {
        let mut out = stdout();
        self.flush_into(&mut out)
    }

    pub fn flush_into<W: Write>(self, out: &mut W) -> Result<u64> {
        let mut prints = 0u64;
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::Print(s) => {
                    prints += 1;
                    queue!(out, Print(s))?
                }
                Command::PrintSelected(s) => {
                    prints += 1;
                    queue!(
                        out,
                        SetAttribute(Attribute::Reverse),
                        Print(s),
                        SetAttribute(Attribute::NoReverse)
                    )?
                }
                Command::ShowCursor => queue!(out, Show)?,
                Command::HideCursor => queue!(out, Hide)?,
            }
        }
        out.flush()?;
        Ok(prints)
    }
}
