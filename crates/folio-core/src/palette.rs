//! Keyboard navigation for the search overlay and command palette.
//!
//! | Chord | Effect |
//! |-------|--------|
//! | Ctrl/Cmd + `/` | open the search overlay |
//! | Ctrl/Cmd + `K` | open the command palette |
//! | Arrow Up / Down | move the highlighted row (clamped) |
//! | Enter | select the highlighted row |
//! | Escape | close |
//!
//! The overlay only tracks which row is highlighted; it never owns results.
//! Callers report the current result count through [`Overlay::set_result_count`].

use anyhow::{bail, Result};

/// A named key, independent of platform modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Enter,
    Escape,
}

/// A key plus the modifiers that matter here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    /// Ctrl on Linux/Windows or Cmd on macOS.
    pub command: bool,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            command: false,
        }
    }

    pub fn command(c: char) -> Self {
        Self {
            key: Key::Char(c),
            command: true,
        }
    }

    /// Parse chords like `ctrl+k`, `cmd+/`, `up`, `enter`, `esc`.
    pub fn parse(input: &str) -> Result<Self> {
        let lowered = input.trim().to_lowercase();
        let mut parts: Vec<&str> = lowered.split('+').collect();
        let key_part = match parts.pop() {
            Some(k) if !k.is_empty() => k,
            _ => bail!("invalid key chord: '{}'", input),
        };

        let mut command = false;
        for modifier in parts {
            match modifier {
                "ctrl" | "control" | "cmd" | "command" | "meta" | "super" => command = true,
                other => bail!("unknown modifier '{}' in '{}'", other, input),
            }
        }

        let key = match key_part {
            "up" | "arrowup" => Key::Up,
            "down" | "arrowdown" => Key::Down,
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            k => {
                let mut chars = k.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => bail!("unknown key '{}' in '{}'", k, input),
                }
            }
        };

        Ok(Self { key, command })
    }
}

/// Which overlay is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    Closed,
    Search,
    Palette,
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    Opened(OverlayMode),
    Closed,
    Highlight(usize),
    Select(usize),
    Ignored,
}

/// Overlay open/closed state plus the highlighted row.
#[derive(Debug, Clone)]
pub struct Overlay {
    mode: OverlayMode,
    selected: usize,
    result_count: usize,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Overlay {
    pub fn new() -> Self {
        Self {
            mode: OverlayMode::Closed,
            selected: 0,
            result_count: 0,
        }
    }

    pub fn mode(&self) -> OverlayMode {
        self.mode
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// New results arrived; the highlight returns to the first row.
    pub fn set_result_count(&mut self, count: usize) {
        self.result_count = count;
        self.selected = 0;
    }

    pub fn handle(&mut self, chord: &KeyChord) -> OverlayAction {
        if chord.command {
            return match chord.key {
                Key::Char('/') => self.open(OverlayMode::Search),
                Key::Char('k') => self.open(OverlayMode::Palette),
                _ => OverlayAction::Ignored,
            };
        }

        if self.mode == OverlayMode::Closed {
            return OverlayAction::Ignored;
        }

        match chord.key {
            Key::Escape => {
                self.mode = OverlayMode::Closed;
                self.selected = 0;
                OverlayAction::Closed
            }
            Key::Down if self.result_count > 0 => {
                self.selected = (self.selected + 1).min(self.result_count - 1);
                OverlayAction::Highlight(self.selected)
            }
            Key::Up if self.result_count > 0 => {
                self.selected = self.selected.saturating_sub(1);
                OverlayAction::Highlight(self.selected)
            }
            Key::Enter if self.result_count > 0 => OverlayAction::Select(self.selected),
            _ => OverlayAction::Ignored,
        }
    }

    fn open(&mut self, mode: OverlayMode) -> OverlayAction {
        self.mode = mode;
        self.selected = 0;
        OverlayAction::Opened(mode)
    }
}
