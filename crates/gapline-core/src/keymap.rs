//! Input code → command mapping.
//!
//! Input arrives as raw codes from a terminal in raw mode: printable
//! characters are themselves, control keys are `0x00..0x20`, and
//! backspace usually arrives as DEL (`0x7f`).

use std::collections::HashMap;

use crate::command::Command;
use crate::config::Config;
use crate::{CoreError, CoreResult};

/// A raw input code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const RETURN: KeyCode = KeyCode(0x0d);
    pub const ESCAPE: KeyCode = KeyCode(0x1b);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const DEL: KeyCode = KeyCode(0x7f);

    /// The code a terminal sends for Ctrl plus `c`.
    ///
    /// Defined for ASCII letters and `@[\]^_`; `Ctrl-?` is DEL.
    pub fn ctrl(c: char) -> Option<KeyCode> {
        match c.to_ascii_uppercase() {
            '?' => Some(KeyCode::DEL),
            upper @ ('@'..='_') => Some(KeyCode(upper as u32 & 0x1f)),
            _ => None,
        }
    }

    /// Parses a binding string: `"ctrl+q"`, `"C-q"`, `"del"`, `"0x11"`, `"a"`.
    pub fn parse(s: &str) -> Option<KeyCode> {
        let s = s.trim();
        let lower = s.to_lowercase();

        if let Some(rest) = lower
            .strip_prefix("ctrl+")
            .or_else(|| lower.strip_prefix("c-"))
        {
            let mut chars = rest.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            return KeyCode::ctrl(c);
        }

        if let Some(hex) = lower.strip_prefix("0x") {
            return u32::from_str_radix(hex, 16).ok().map(KeyCode);
        }

        match lower.as_str() {
            "del" | "backspace" | "bs" => Some(KeyCode::DEL),
            "enter" | "return" | "ret" => Some(KeyCode::RETURN),
            "tab" => Some(KeyCode::TAB),
            "escape" | "esc" => Some(KeyCode::ESCAPE),
            "space" | "spc" => Some(KeyCode::SPACE),
            _ => {
                let mut chars = s.chars();
                let c = chars.next()?;
                chars.next().is_none().then_some(KeyCode(c as u32))
            }
        }
    }

    /// Returns true for codes that insert themselves when unbound.
    pub fn is_self_inserting(&self) -> bool {
        char::from_u32(self.0)
            .is_some_and(|c| !c.is_control() || matches!(c, '\r' | '\n' | '\t'))
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            KeyCode::TAB => write!(f, "TAB"),
            KeyCode::RETURN => write!(f, "RET"),
            KeyCode::ESCAPE => write!(f, "ESC"),
            KeyCode::SPACE => write!(f, "SPC"),
            KeyCode::DEL => write!(f, "DEL"),
            KeyCode(code @ 0..=0x1f) => {
                let c = char::from((code as u8 | 0x40).to_ascii_lowercase());
                write!(f, "C-{c}")
            }
            KeyCode(code) => match char::from_u32(code) {
                Some(c) => write!(f, "{c}"),
                None => write!(f, "{code:#x}"),
            },
        }
    }
}

/// Keyboard mapping configuration.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyCode, Command>,
}

impl Keymap {
    /// Creates a keymap with the default Emacs-style bindings.
    pub fn new() -> Self {
        let mut keymap = Self {
            bindings: HashMap::new(),
        };
        keymap.add_default_bindings();
        keymap
    }

    /// Creates a keymap from configuration.
    ///
    /// Bad entries are logged and skipped; the rest still apply.
    pub fn from_config(config: &Config) -> Self {
        let mut keymap = Self::new();

        for (key_str, cmd_str) in &config.keyboard.bindings {
            if let Err(err) = keymap.bind_named(key_str, cmd_str) {
                tracing::warn!(%err, "skipping key binding");
            }
        }

        keymap
    }

    fn add_default_bindings(&mut self) {
        use crate::command::Command::*;

        let defaults = [
            ('q', Quit),
            ('f', ForwardChar),
            ('b', BackwardChar),
            ('a', BeginningOfLine),
            ('e', EndOfLine),
            ('n', NextLine),
            ('p', PreviousLine),
            ('d', DeleteChar),
            ('h', DeleteBackwardChar),
            ('u', UniversalArgument),
        ];

        for (c, cmd) in defaults {
            if let Some(key) = KeyCode::ctrl(c) {
                self.bindings.insert(key, cmd);
            }
        }
        self.bindings.insert(KeyCode::DEL, DeleteBackwardChar);
    }

    /// Binds a key, replacing any previous binding.
    pub fn bind(&mut self, key: KeyCode, command: Command) {
        self.bindings.insert(key, command);
    }

    /// Binds from config strings, e.g. `("ctrl+t", "beginning-of-buffer")`.
    pub fn bind_named(&mut self, key: &str, command: &str) -> CoreResult<()> {
        let code = KeyCode::parse(key)
            .ok_or_else(|| CoreError::InvalidBinding(format!("unknown key `{key}`")))?;
        let cmd = Command::parse(command)
            .ok_or_else(|| CoreError::InvalidBinding(format!("unknown command `{command}`")))?;
        self.bind(code, cmd);
        Ok(())
    }

    /// Finds the command for an input code.
    ///
    /// Unbound printable codes (and return/tab) self-insert.
    pub fn lookup(&self, code: u32) -> Option<Command> {
        let key = KeyCode(code);
        self.bindings
            .get(&key)
            .copied()
            .or_else(|| key.is_self_inserting().then_some(Command::SelfInsert))
    }

    /// All explicit bindings, sorted by key code.
    pub fn bindings(&self) -> Vec<(KeyCode, Command)> {
        let mut all: Vec<_> = self.bindings.iter().map(|(k, c)| (*k, *c)).collect();
        all.sort_by_key(|(key, _)| *key);
        all
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}
