//! Editor commands and what they do to the buffer.
//!
//! ## Learning: The Command Pattern
//!
//! Commands are plain values. The keymap hands one back for an input
//! code, the editor runs it with a prefix argument, and the result is
//! reported through the context rather than by return value:
//! - `exit`: the session should end
//! - `bell`: the command hit an edge and did nothing (or stopped early)

use gapline_buffer::{BufferResult, GapBuffer};

use crate::CoreResult;

/// Built-in editor commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Editing
    SelfInsert,
    DeleteBackwardChar,
    DeleteChar,

    // Character motion
    ForwardChar,
    BackwardChar,

    // Line motion
    BeginningOfLine,
    EndOfLine,
    NextLine,
    PreviousLine,

    // Buffer motion
    BeginningOfBuffer,
    EndOfBuffer,

    // Session
    UniversalArgument,
    Quit,
}

impl Command {
    /// Every command, in declaration order.
    pub const ALL: [Command; 13] = [
        Command::SelfInsert,
        Command::DeleteBackwardChar,
        Command::DeleteChar,
        Command::ForwardChar,
        Command::BackwardChar,
        Command::BeginningOfLine,
        Command::EndOfLine,
        Command::NextLine,
        Command::PreviousLine,
        Command::BeginningOfBuffer,
        Command::EndOfBuffer,
        Command::UniversalArgument,
        Command::Quit,
    ];

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::SelfInsert => "Insert Character",
            Command::DeleteBackwardChar => "Delete Backward",
            Command::DeleteChar => "Delete Forward",
            Command::ForwardChar => "Forward Character",
            Command::BackwardChar => "Backward Character",
            Command::BeginningOfLine => "Beginning of Line",
            Command::EndOfLine => "End of Line",
            Command::NextLine => "Next Line",
            Command::PreviousLine => "Previous Line",
            Command::BeginningOfBuffer => "Beginning of Buffer",
            Command::EndOfBuffer => "End of Buffer",
            Command::UniversalArgument => "Universal Argument",
            Command::Quit => "Quit",
        }
    }

    /// Name used in config files, e.g. `"forward-char"`.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelfInsert => "self-insert",
            Command::DeleteBackwardChar => "delete-backward-char",
            Command::DeleteChar => "delete-char",
            Command::ForwardChar => "forward-char",
            Command::BackwardChar => "backward-char",
            Command::BeginningOfLine => "beginning-of-line",
            Command::EndOfLine => "end-of-line",
            Command::NextLine => "next-line",
            Command::PreviousLine => "previous-line",
            Command::BeginningOfBuffer => "beginning-of-buffer",
            Command::EndOfBuffer => "end-of-buffer",
            Command::UniversalArgument => "universal-argument",
            Command::Quit => "quit",
        }
    }

    /// Parses a config name back into a command.
    pub fn parse(s: &str) -> Option<Command> {
        let s = s.trim();
        Command::ALL.into_iter().find(|cmd| cmd.name() == s)
    }

    /// Runs the command against the buffer in `ctx`.
    ///
    /// A negative prefix argument reverses direction for motion and
    /// deletion; insertion uses its absolute value.
    pub fn execute(self, ctx: &mut CommandContext<'_>) -> CoreResult<()> {
        let times = ctx.arg.unsigned_abs();
        let forward = ctx.arg >= 0;

        match self {
            Command::SelfInsert => match ctx.inserted_char() {
                Some(ch) => ctx.repeat(times, |buffer| buffer.insert(ch)),
                None => {
                    ctx.bell = true;
                    Ok(())
                }
            },
            Command::DeleteBackwardChar if forward => {
                ctx.repeat(times, GapBuffer::delete_previous)
            }
            Command::DeleteBackwardChar => ctx.repeat(times, GapBuffer::delete_next),
            Command::DeleteChar if forward => ctx.repeat(times, GapBuffer::delete_next),
            Command::DeleteChar => ctx.repeat(times, GapBuffer::delete_previous),
            Command::ForwardChar => {
                let step = if forward { 1 } else { -1 };
                ctx.repeat(times, |buffer| buffer.point_move(step))
            }
            Command::BackwardChar => {
                let step = if forward { -1 } else { 1 };
                ctx.repeat(times, |buffer| buffer.point_move(step))
            }
            Command::BeginningOfLine => {
                let start = ctx.buffer.line_start(ctx.buffer.point())?;
                ctx.buffer.point_set(start)?;
                Ok(())
            }
            Command::EndOfLine => {
                let end = ctx.buffer.line_end(ctx.buffer.point())?;
                ctx.buffer.point_set(end)?;
                Ok(())
            }
            Command::NextLine => ctx.move_lines(ctx.arg),
            Command::PreviousLine => ctx.move_lines(ctx.arg.saturating_neg()),
            Command::BeginningOfBuffer => {
                ctx.buffer.point_set(0)?;
                Ok(())
            }
            Command::EndOfBuffer => {
                let len = ctx.buffer.len();
                ctx.buffer.point_set(len)?;
                Ok(())
            }
            Command::UniversalArgument => {
                // Prefix state lives in the editor; nothing to do on the buffer.
                tracing::debug!("universal-argument reached the buffer");
                Ok(())
            }
            Command::Quit => {
                ctx.exit = true;
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Context passed to command execution.
pub struct CommandContext<'a> {
    pub buffer: &'a mut GapBuffer,

    /// Prefix argument; 1 when none was given
    pub arg: i32,

    /// Input code that triggered the command
    pub code: u32,

    /// Set when the session should end
    pub exit: bool,

    /// Set when an operation was refused at a boundary
    pub bell: bool,
}

impl<'a> CommandContext<'a> {
    pub fn new(buffer: &'a mut GapBuffer, arg: i32, code: u32) -> Self {
        Self {
            buffer,
            arg,
            code,
            exit: false,
            bell: false,
        }
    }

    /// The character a self-insert of `code` produces. Return becomes newline.
    fn inserted_char(&self) -> Option<char> {
        match char::from_u32(self.code)? {
            '\r' => Some('\n'),
            ch => Some(ch),
        }
    }

    /// Turns a buffer result into "did it happen".
    ///
    /// Boundary failures ring the bell; anything else is logged and
    /// propagates.
    fn check<T>(&mut self, result: BufferResult<T>) -> CoreResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_usage_error() => {
                tracing::debug!(%err, "refused at boundary");
                self.bell = true;
                Ok(None)
            }
            Err(err) => {
                tracing::error!(%err, "buffer operation failed");
                Err(err.into())
            }
        }
    }

    /// Runs `op` up to `times` times, stopping at the first refusal.
    fn repeat<T>(
        &mut self,
        times: u32,
        mut op: impl FnMut(&mut GapBuffer) -> BufferResult<T>,
    ) -> CoreResult<()> {
        for _ in 0..times {
            let result = op(&mut *self.buffer);
            if self.check(result)?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Moves the point `lines` lines down (up if negative), keeping the
    /// column where the target line is long enough.
    fn move_lines(&mut self, lines: i32) -> CoreResult<()> {
        let buffer = &mut *self.buffer;
        let point = buffer.point();
        let column = point - buffer.line_start(point)?;
        let mut target = point;

        for _ in 0..lines.unsigned_abs() {
            let line_start = if lines > 0 {
                let end = buffer.line_end(target)?;
                if end == buffer.len() {
                    self.bell = true;
                    break;
                }
                end + 1
            } else {
                let start = buffer.line_start(target)?;
                if start == 0 {
                    self.bell = true;
                    break;
                }
                buffer.line_start(start - 1)?
            };
            let line_end = buffer.line_end(line_start)?;
            target = (line_start + column).min(line_end);
        }

        buffer.point_set(target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(buffer: &mut GapBuffer, cmd: Command, arg: i32, code: u32) -> (bool, bool) {
        let mut ctx = CommandContext::new(buffer, arg, code);
        cmd.execute(&mut ctx).unwrap();
        (ctx.exit, ctx.bell)
    }

    #[test]
    fn test_command_names_round_trip() {
        for cmd in Command::ALL {
            assert_eq!(Command::parse(cmd.name()), Some(cmd));
        }
        assert_eq!(Command::parse("no-such-command"), None);
        assert_eq!(Command::Quit.display_name(), "Quit");
        assert_eq!(Command::NextLine.to_string(), "next-line");
    }

    #[test]
    fn test_self_insert_repeats() {
        let mut buffer = GapBuffer::new();
        run(&mut buffer, Command::SelfInsert, 3, 'x' as u32);
        assert_eq!(buffer.text(), "xxx");

        run(&mut buffer, Command::SelfInsert, -2, 'y' as u32);
        assert_eq!(buffer.text(), "xxxyy");
    }

    #[test]
    fn test_self_insert_return_is_newline() {
        let mut buffer = GapBuffer::new();
        run(&mut buffer, Command::SelfInsert, 1, '\r' as u32);
        assert_eq!(buffer.text(), "\n");
    }

    #[test]
    fn test_self_insert_invalid_code_rings() {
        let mut buffer = GapBuffer::new();
        let (_, bell) = run(&mut buffer, Command::SelfInsert, 1, 0xD800);
        assert!(bell);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_forward_char_stops_at_end() {
        let mut buffer = GapBuffer::from("abc");
        buffer.point_set(1).unwrap();

        let (_, bell) = run(&mut buffer, Command::ForwardChar, 5, 0);
        assert!(bell);
        assert_eq!(buffer.point(), 3);

        let (_, bell) = run(&mut buffer, Command::ForwardChar, -2, 0);
        assert!(!bell);
        assert_eq!(buffer.point(), 1);
    }

    #[test]
    fn test_backward_char_rings_at_start() {
        let mut buffer = GapBuffer::from("ab");
        buffer.point_set(0).unwrap();
        let (_, bell) = run(&mut buffer, Command::BackwardChar, 1, 0);
        assert!(bell);
        assert_eq!(buffer.point(), 0);
    }

    #[test]
    fn test_delete_backward_char() {
        let mut buffer = GapBuffer::from("hello");
        let (_, bell) = run(&mut buffer, Command::DeleteBackwardChar, 2, 0);
        assert!(!bell);
        assert_eq!(buffer.text(), "hel");

        let (_, bell) = run(&mut buffer, Command::DeleteBackwardChar, 10, 0);
        assert!(bell);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_delete_char_with_negative_arg_deletes_backward() {
        let mut buffer = GapBuffer::from("hello");
        buffer.point_set(2).unwrap();
        run(&mut buffer, Command::DeleteChar, 1, 0);
        assert_eq!(buffer.text(), "helo");
        run(&mut buffer, Command::DeleteChar, -1, 0);
        assert_eq!(buffer.text(), "hlo");
        assert_eq!(buffer.point(), 1);
    }

    #[test]
    fn test_line_ends() {
        let mut buffer = GapBuffer::from("ab\ncde\nf");
        buffer.point_set(4).unwrap();
        run(&mut buffer, Command::BeginningOfLine, 1, 0);
        assert_eq!(buffer.point(), 3);
        run(&mut buffer, Command::EndOfLine, 1, 0);
        assert_eq!(buffer.point(), 6);
        // Already at end: stays on this line rather than jumping past the newline
        run(&mut buffer, Command::EndOfLine, 1, 0);
        assert_eq!(buffer.point(), 6);
    }

    #[test]
    fn test_next_line_keeps_column() {
        let mut buffer = GapBuffer::from("abcd\nefgh\nij");
        buffer.point_set(2).unwrap();

        run(&mut buffer, Command::NextLine, 1, 0);
        assert_eq!(buffer.point(), 7);

        // Last line is shorter: clamp to its end
        run(&mut buffer, Command::NextLine, 1, 0);
        assert_eq!(buffer.point(), 12);

        let (_, bell) = run(&mut buffer, Command::NextLine, 1, 0);
        assert!(bell);
        assert_eq!(buffer.point(), 12);
    }

    #[test]
    fn test_previous_line() {
        let mut buffer = GapBuffer::from("ab\ncdef\ngh");
        buffer.point_set(7).unwrap();

        run(&mut buffer, Command::PreviousLine, 1, 0);
        assert_eq!(buffer.point(), 2);

        let (_, bell) = run(&mut buffer, Command::PreviousLine, 1, 0);
        assert!(bell);
        assert_eq!(buffer.point(), 2);
    }

    #[test]
    fn test_line_motion_with_count() {
        let mut buffer = GapBuffer::from("a\nb\nc\nd");
        buffer.point_set(0).unwrap();
        run(&mut buffer, Command::NextLine, 3, 0);
        assert_eq!(buffer.point(), 6);
        run(&mut buffer, Command::NextLine, -2, 0);
        assert_eq!(buffer.point(), 2);
    }

    #[test]
    fn test_buffer_ends() {
        let mut buffer = GapBuffer::from("abc\ndef");
        run(&mut buffer, Command::BeginningOfBuffer, 1, 0);
        assert_eq!(buffer.point(), 0);
        run(&mut buffer, Command::EndOfBuffer, 1, 0);
        assert_eq!(buffer.point(), 7);
    }

    #[test]
    fn test_quit_sets_exit() {
        let mut buffer = GapBuffer::new();
        let (exit, bell) = run(&mut buffer, Command::Quit, 1, 0x11);
        assert!(exit);
        assert!(!bell);
    }
}
