//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` is the one thing the input loop talks to. It owns the buffer,
//! the keymap and the pending prefix argument; the loop only feeds it
//! input codes and redisplays.

use std::path::Path;

use gapline_buffer::GapBuffer;

use crate::command::{Command, CommandContext};
use crate::config::Config;
use crate::display::{Display, Frame};
use crate::keymap::Keymap;
use crate::CoreResult;

/// What the input loop needs to know after one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// The session should end
    pub exit: bool,

    /// Something was refused; signal the user
    pub bell: bool,
}

/// A prefix argument being typed (`C-u`, `C-u C-u`, `C-u 1 2`, `C-u -`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Prefix {
    value: i32,
    negative: bool,
    /// Digits have been typed, so `C-u` no longer multiplies
    typed: bool,
    /// `C-u` after digits ends the argument; later digits are text
    closed: bool,
}

impl Prefix {
    fn start() -> Self {
        Self {
            value: 4,
            negative: false,
            typed: false,
            closed: false,
        }
    }

    fn arg(&self) -> i32 {
        if self.negative { -self.value } else { self.value }
    }

    /// Feeds one code to the pending argument. Returns false if the code
    /// is not part of the argument and should run as a command.
    fn accept(&mut self, code: u32) -> bool {
        if self.closed {
            return false;
        }
        match char::from_u32(code) {
            Some(c @ '0'..='9') => {
                let digit = c as i32 - '0' as i32;
                self.value = if self.typed {
                    self.value.saturating_mul(10).saturating_add(digit)
                } else {
                    digit
                };
                self.typed = true;
                true
            }
            Some('-') if !self.typed && !self.negative => {
                self.negative = true;
                self.value = 1;
                true
            }
            _ => false,
        }
    }
}

/// The editor session state.
///
/// Owned by the single thread running the read-evaluate-redisplay loop.
pub struct Editor {
    buffer: GapBuffer,

    /// Editor configuration
    config: Config,

    /// Key bindings
    keymap: Keymap,

    /// Prefix argument waiting for its command
    prefix: Option<Prefix>,

    /// Whether the editor should quit
    should_quit: bool,
}

impl Editor {
    /// Creates an editor with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an editor with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let keymap = Keymap::from_config(&config);
        Self {
            buffer: GapBuffer::with_config(config.buffer),
            config,
            keymap,
            prefix: None,
            should_quit: false,
        }
    }

    /// Creates an editor from a config file.
    pub fn from_config_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let config = Config::load_from(path)?;
        Ok(Self::with_config(config))
    }

    // ==================== Input ====================

    /// Evaluates one input code.
    ///
    /// Boundary refusals come back as `bell`; only buffer defects are
    /// errors.
    pub fn evaluate(&mut self, code: u32) -> CoreResult<Evaluation> {
        tracing::trace!(code, "input code");

        if self.should_quit {
            return Ok(Evaluation {
                exit: true,
                bell: false,
            });
        }

        if let Some(prefix) = self.prefix.as_mut() {
            if prefix.accept(code) {
                return Ok(Evaluation::default());
            }
        }

        let Some(command) = self.keymap.lookup(code) else {
            tracing::debug!(code, "unbound code");
            self.prefix = None;
            return Ok(Evaluation {
                exit: false,
                bell: true,
            });
        };

        if command == Command::UniversalArgument {
            self.universal_argument();
            return Ok(Evaluation::default());
        }

        let arg = self.prefix.take().map_or(1, |prefix| prefix.arg());
        tracing::debug!(%command, arg, "dispatch");

        let mut ctx = CommandContext::new(&mut self.buffer, arg, code);
        command.execute(&mut ctx)?;

        self.should_quit |= ctx.exit;
        Ok(Evaluation {
            exit: ctx.exit,
            bell: ctx.bell,
        })
    }

    /// Evaluates codes until one asks to exit.
    ///
    /// Returns how many codes rang the bell.
    pub fn evaluate_all(&mut self, codes: impl IntoIterator<Item = u32>) -> CoreResult<usize> {
        let mut bells = 0;
        for code in codes {
            let eval = self.evaluate(code)?;
            if eval.bell {
                bells += 1;
            }
            if eval.exit {
                break;
            }
        }
        Ok(bells)
    }

    fn universal_argument(&mut self) {
        match self.prefix.as_mut() {
            None => self.prefix = Some(Prefix::start()),
            Some(prefix) if !prefix.typed => {
                prefix.value = prefix.value.saturating_mul(4);
            }
            Some(prefix) => prefix.closed = true,
        }
    }

    // ==================== State ====================

    /// Renders the buffer with the configured display settings.
    pub fn render(&self) -> CoreResult<Frame> {
        Ok(Display::from_config(&self.config).render(&self.buffer)?)
    }

    pub fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Mutable keymap, for rebinding at runtime.
    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    /// The prefix argument currently being typed, if any.
    pub fn pending_argument(&self) -> Option<i32> {
        self.prefix.map(|prefix| prefix.arg())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
