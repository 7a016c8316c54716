//! Configuration loading and parsing.
//!
//! Parses `ted.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [editor]
//! initial_text = "hello\nworld"
//!
//! [view]
//! margin_left = 1
//! margin_top = 1
//! ```
//!
//! Every field is optional. A missing or unparsable file yields defaults; the
//! editor must start even with a broken config. Unknown fields are ignored.
//!
//! Margins are raw values; `Config::apply_context` clamps them against the
//! current terminal size so at least one text cell stays visible, and keeps
//! the raw values so a later resize can re-clamp.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "ted.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Buffer content at startup when `--text` is not given.
    #[serde(default)]
    pub initial_text: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    #[serde(default = "ViewConfig::default_margin")]
    pub margin_left: u16,
    #[serde(default = "ViewConfig::default_margin")]
    pub margin_top: u16,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            margin_left: Self::default_margin(),
            margin_top: Self::default_margin(),
        }
    }
}

impl ViewConfig {
    const fn default_margin() -> u16 {
        1
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

/// Effective margins after clamping to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveMargins {
    pub left: u16,
    pub top: u16,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // raw file contents, when one was read
    pub file: ConfigFile,    // parsed (or default) data
    pub effective_margins: EffectiveMargins,
}

/// Config path: local `ted.toml` first, then the platform config dir
/// (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ted").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_not_found_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                effective_margins: EffectiveMargins {
                    left: file.view.margin_left,
                    top: file.view.margin_top,
                },
                file,
            })
        }
        Err(err) => {
            warn!(target: "config", path = %path.display(), %err, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn initial_text(&self) -> Option<&str> {
        self.file.editor.initial_text.as_deref()
    }

    /// Clamp the configured margins so at least one column and one row of
    /// text remain. Returns the effective margins.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> EffectiveMargins {
        let raw_left = self.file.view.margin_left;
        let raw_top = self.file.view.margin_top;
        let left = raw_left.min(ctx.viewport_columns.saturating_sub(1));
        let top = raw_top.min(ctx.viewport_rows.saturating_sub(1));
        if left != raw_left || top != raw_top {
            info!(
                target: "config",
                raw_left,
                raw_top,
                left,
                top,
                viewport_columns = ctx.viewport_columns,
                viewport_rows = ctx.viewport_rows,
                "view_margins_clamped"
            );
        }
        self.effective_margins = EffectiveMargins { left, top };
        self.effective_margins
    }

    /// Recompute after a resize. Returns `Some(new)` when the effective
    /// margins changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<EffectiveMargins> {
        let prev = self.effective_margins;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }
}

impl Default for EffectiveMargins {
    fn default() -> Self {
        let view = ViewConfig::default();
        Self {
            left: view.margin_left,
            top: view.margin_top,
        }
    }
}
