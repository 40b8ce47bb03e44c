//! # Gapline Core
//!
//! Everything around the gap buffer: turning input codes into commands,
//! running them against the buffer, and rendering the result.
//!
//! ## Architecture Overview
//!
//! ```text
//! input code ──► Keymap ──► Command ──► Editor ──► GapBuffer
//!                                         │
//!                                         ▼
//!                              Display ──► Frame (read-only)
//! ```
//!
//! Everything runs on one thread, one key at a time: read a code,
//! evaluate it, redisplay.

pub mod command;
pub mod config;
pub mod display;
pub mod editor;
pub mod keymap;

pub use command::{Command, CommandContext};
pub use config::Config;
pub use display::{Display, Frame, InternalsView};
pub use editor::{Editor, Evaluation};
pub use keymap::{KeyCode, Keymap};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
///
/// Boundary failures (backspace at the start, moving past the end) are not
/// errors here; they ring the bell. What reaches this type is either a
/// buffer defect or bad configuration.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Buffer error: {0}")]
    Buffer(#[from] gapline_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid key binding: {0}")]
    InvalidBinding(String),
}
