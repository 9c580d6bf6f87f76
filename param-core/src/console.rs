//! Interactive text console.
//!
//! A byte-at-a-time line editor in front of the command table. The session
//! is a plain state object owned by the driving loop: feed it every received
//! byte through [`ConsoleSession::process`] and it echoes, edits, completes
//! and dispatches without ever blocking.
//!
//! # Key handling
//!
//! | Byte | Action |
//! |------|--------|
//! | `0x20..=0x7E` | append and echo (leading space dropped, full buffer ignored) |
//! | `0x7F` | erase last character |
//! | `0x09`, `?` | complete command name |
//! | `0x04` | leave the console, on an empty line only |
//! | `0x0C` | clear screen and redraw |
//! | CR, LF | run the line |

use heapless::Vec;

use crate::command::Shell;
use crate::engine::ResetKind;

/// Edit buffer capacity in bytes.
pub const CONSOLE_BUFFER_LEN: usize = 48;

/// Prompt printed before every line.
pub const PROMPT: &str = "\r\n# ";

const BANNER: &str = "\r\nEntering CLI Mode, type 'exit' or 'save' to return, or 'help' \r\n\r\n";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";
const CLEAR_LINE: &str = "\r\x1b[K";
const ERASE: &[u8] = b"\x08 \x08";

const EOT: u8 = 0x04;
const TAB: u8 = 0x09;
const FORM_FEED: u8 = 0x0C;
const DELETE: u8 = 0x7F;

/// Console mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    Inactive,
    Editing,
}

/// Outcome of processing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Still in the console.
    Active,
    /// The console closed and the engine was asked to restart.
    Exited(ResetKind),
}

/// Line editor state for one console session.
#[derive(Debug, Default)]
pub struct ConsoleSession {
    buffer: Vec<u8, CONSOLE_BUFFER_LEN>,
    mode: Mode,
}

impl ConsoleSession {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            mode: Mode::Inactive,
        }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode == Mode::Editing
    }

    /// Current line contents.
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Enter the console: banner, `version`, `help`, prompt.
    ///
    /// Does nothing if the console is already active.
    pub fn activate(&mut self, shell: &mut Shell<'_, '_>) {
        if self.is_active() {
            return;
        }
        debug!("console activated");
        self.mode = Mode::Editing;
        self.buffer.clear();

        shell.print(BANNER);
        run_builtin(shell, "version");
        shell.print("\r\n\r\n");
        run_builtin(shell, "help");
        shell.print(PROMPT);
    }

    /// Handle a run of received bytes. Stops early if the console exits.
    pub fn process_bytes(&mut self, bytes: &[u8], shell: &mut Shell<'_, '_>) -> Status {
        for &byte in bytes {
            if let Status::Exited(kind) = self.process(byte, shell) {
                return Status::Exited(kind);
            }
        }
        Status::Active
    }

    /// Handle one received byte, activating the console first if needed.
    pub fn process(&mut self, byte: u8, shell: &mut Shell<'_, '_>) -> Status {
        self.activate(shell);

        match byte {
            TAB | b'?' => self.complete(shell),
            EOT if self.buffer.is_empty() => return self.submit(shell, "exit"),
            FORM_FEED => {
                shell.print(CLEAR_SCREEN);
                shell.print(PROMPT);
                shell.write_bytes(&self.buffer);
            }
            b'\r' | b'\n' if !self.buffer.is_empty() => {
                shell.print("\r\n");
                let line = self.buffer.clone();
                self.buffer.clear();
                return match core::str::from_utf8(&line) {
                    Ok(line) => self.submit(shell, line),
                    // Only printable ASCII is ever buffered.
                    Err(_) => {
                        shell.print(crate::command::UNKNOWN_COMMAND);
                        shell.print(PROMPT);
                        Status::Active
                    }
                };
            }
            DELETE => {
                if self.buffer.pop().is_some() {
                    shell.write_bytes(ERASE);
                }
            }
            b' ' if self.buffer.is_empty() => {}
            0x20..=0x7E => {
                if self.buffer.push(byte).is_ok() {
                    shell.write_bytes(&[byte]);
                }
            }
            _ => {}
        }
        Status::Active
    }

    /// Dispatch a line and either redraw the prompt or leave.
    fn submit(&mut self, shell: &mut Shell<'_, '_>, line: &str) -> Status {
        shell.dispatch(line);
        match shell.take_exit() {
            Some(kind) => {
                debug!("console closed");
                self.buffer.clear();
                self.mode = Mode::Inactive;
                shell.engine().reset(kind);
                Status::Exited(kind)
            }
            None => {
                shell.print(PROMPT);
                Status::Active
            }
        }
    }

    /// Extend the buffer to the longest common prefix of the matching
    /// commands; list the candidates when the result is still ambiguous.
    fn complete(&mut self, shell: &mut Shell<'_, '_>) {
        let typed = self.buffer.len();
        let matches = match core::str::from_utf8(&self.buffer) {
            Ok(partial) => shell.commands().completions(partial),
            Err(_) => return,
        };

        if let (Some(first), Some(last)) = (matches.first(), matches.last()) {
            let (first, last) = (first.name.as_bytes(), last.name.as_bytes());
            let mut i = self.buffer.len();
            loop {
                match (first.get(i), last.get(i)) {
                    (Some(a), Some(b)) if a == b => {
                        if self.buffer.push(*a).is_err() {
                            break;
                        }
                    }
                    (None, None) => {
                        let _ = self.buffer.push(b' ');
                        break;
                    }
                    _ => break,
                }
                i += 1;
            }
        }

        if self.buffer.is_empty() || matches.len() > 1 {
            shell.print(CLEAR_LINE);
            for cmd in matches {
                shell.print(cmd.name);
                shell.write_bytes(b"\t");
            }
            shell.print(PROMPT);
            shell.write_bytes(&self.buffer);
        } else {
            shell.write_bytes(&self.buffer[typed..]);
        }
    }
}

/// Run a command by name if the table has it.
fn run_builtin(shell: &mut Shell<'_, '_>, name: &str) {
    if let Some(cmd) = shell.commands().lookup(name) {
        (cmd.handler)(shell, "");
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::command::{Command, CommandTable};
    use crate::registry::Registry;
    use crate::testing::{MockEngine, MockOutput};
    use std::string::String;

    fn version(shell: &mut Shell<'_, '_>, _args: &str) {
        shell.print("v1");
    }

    fn help(shell: &mut Shell<'_, '_>, _args: &str) {
        shell.print("HELP");
    }

    fn echo(shell: &mut Shell<'_, '_>, args: &str) {
        shell.print_fmt(format_args!("<{}>", args));
    }

    fn exit(shell: &mut Shell<'_, '_>, _args: &str) {
        shell.print("bye");
        shell.request_exit(ResetKind::Warm);
    }

    fn noop(_shell: &mut Shell<'_, '_>, _args: &str) {}

    const COMMANDS: &[Command] = &[
        Command::new("echo", "", echo),
        Command::new("exit", "", exit),
        Command::new("help", "", help),
        Command::new("mixer", "", noop),
        Command::new("save", "", noop),
        Command::new("set", "", noop),
        Command::new("status", "", noop),
        Command::new("version", "", version),
    ];
    const TABLE: CommandTable = CommandTable::new(COMMANDS);

    struct Harness {
        out: MockOutput,
        engine: MockEngine,
        session: ConsoleSession,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                out: MockOutput::new(),
                engine: MockEngine::new(),
                session: ConsoleSession::new(),
            }
        }

        /// Feed bytes and return everything printed by them.
        fn feed(&mut self, bytes: &[u8]) -> (Status, String) {
            let registry = Registry::new(&[]);
            self.out.clear();
            let mut shell = Shell::new(&mut self.out, &registry, &mut self.engine, &TABLE);
            let status = self.session.process_bytes(bytes, &mut shell);
            (status, self.out.text())
        }

        fn activated() -> Self {
            let mut harness = Self::new();
            harness.feed(b"\r");
            harness
        }
    }

    #[test]
    fn test_first_byte_activates_with_banner() {
        let mut h = Harness::new();
        assert!(!h.session.is_active());

        let (status, text) = h.feed(b"\r");
        assert_eq!(status, Status::Active);
        assert!(h.session.is_active());
        assert_eq!(
            text,
            "\r\nEntering CLI Mode, type 'exit' or 'save' to return, or 'help' \r\n\r\n\
             v1\r\n\r\nHELP\r\n# "
        );
    }

    #[test]
    fn test_printable_bytes_are_echoed() {
        let mut h = Harness::activated();
        let (_, text) = h.feed(b"set");
        assert_eq!(text, "set");
        assert_eq!(h.session.buffer(), b"set");
    }

    #[test]
    fn test_leading_space_suppressed() {
        let mut h = Harness::activated();
        let (_, text) = h.feed(b"  a b");
        assert_eq!(text, "a b");
        assert_eq!(h.session.buffer(), b"a b");
    }

    #[test]
    fn test_full_buffer_ignores_input() {
        let mut h = Harness::activated();
        h.feed(&[b'x'; CONSOLE_BUFFER_LEN]);
        let (_, text) = h.feed(b"yz");
        assert_eq!(text, "");
        assert_eq!(h.session.buffer().len(), CONSOLE_BUFFER_LEN);
    }

    #[test]
    fn test_delete_erases_last_byte() {
        let mut h = Harness::activated();
        h.feed(b"ab");
        let (_, text) = h.feed(&[DELETE]);
        assert_eq!(text, "\x08 \x08");
        assert_eq!(h.session.buffer(), b"a");

        h.feed(&[DELETE]);
        let (_, text) = h.feed(&[DELETE]);
        assert_eq!(text, "");
        assert!(h.session.buffer().is_empty());
    }

    #[test]
    fn test_control_bytes_ignored() {
        let mut h = Harness::activated();
        let (_, text) = h.feed(&[0x01, 0x1B, 0x80, 0xFF]);
        assert_eq!(text, "");
        assert!(h.session.buffer().is_empty());
    }

    #[test]
    fn test_enter_on_empty_line_does_nothing() {
        let mut h = Harness::activated();
        let (_, text) = h.feed(b"\r\n");
        assert_eq!(text, "");
    }

    #[test]
    fn test_enter_dispatches_and_redraws_prompt() {
        let mut h = Harness::activated();
        let (status, text) = h.feed(b"echo hi there\r");
        assert_eq!(status, Status::Active);
        assert_eq!(text, "echo hi there\r\n<hi there>\r\n# ");
        assert!(h.session.buffer().is_empty());
    }

    #[test]
    fn test_unknown_command_diagnostic() {
        let mut h = Harness::activated();
        let (status, text) = h.feed(b"bogus\n");
        assert_eq!(status, Status::Active);
        assert_eq!(text, "bogus\r\nUnknown command, try 'help'\r\n# ");
    }

    #[test]
    fn test_completion_single_match_appends_space() {
        let mut h = Harness::activated();
        h.feed(b"mi");
        let (_, text) = h.feed(b"\t");
        assert_eq!(h.session.buffer(), b"mixer ");
        assert_eq!(text, "xer ");
    }

    #[test]
    fn test_completion_extends_to_common_prefix() {
        let mut h = Harness::activated();
        h.feed(b"st");
        let (_, text) = h.feed(b"?");
        assert_eq!(h.session.buffer(), b"status ");
        assert_eq!(text, "atus ");

        let mut h = Harness::activated();
        h.feed(b"e");
        let (_, text) = h.feed(b"\t");
        // echo and exit share only the "e".
        assert_eq!(h.session.buffer(), b"e");
        assert_eq!(text, "\r\x1b[Kecho\texit\t\r\n# e");
    }

    #[test]
    fn test_completion_ambiguous_lists_candidates() {
        let mut h = Harness::activated();
        h.feed(b"s");
        let (_, text) = h.feed(b"\t");
        assert_eq!(h.session.buffer(), b"s");
        assert_eq!(text, "\r\x1b[Ksave\tset\tstatus\t\r\n# s");
    }

    #[test]
    fn test_completion_is_deterministic() {
        let mut first = Harness::activated();
        first.feed(b"se");
        let (_, a) = first.feed(b"\t");

        let mut second = Harness::activated();
        second.feed(b"se");
        let (_, b) = second.feed(b"\t");

        assert_eq!(a, b);
        assert_eq!(first.session.buffer(), second.session.buffer());
        assert_eq!(first.session.buffer(), b"set ");
    }

    #[test]
    fn test_completion_on_empty_buffer_lists_everything() {
        let mut h = Harness::activated();
        let (_, text) = h.feed(b"\t");
        assert!(text.starts_with("\r\x1b[Kecho\texit\thelp\t"));
        assert!(text.ends_with("version\t\r\n# "));
    }

    #[test]
    fn test_completion_without_match_is_silent() {
        let mut h = Harness::activated();
        h.feed(b"zz");
        let (_, text) = h.feed(b"\t");
        assert_eq!(text, "");
        assert_eq!(h.session.buffer(), b"zz");
    }

    #[test]
    fn test_form_feed_clears_and_redraws() {
        let mut h = Harness::activated();
        h.feed(b"se");
        let (_, text) = h.feed(&[FORM_FEED]);
        assert_eq!(text, "\x1b[2J\x1b[1;1H\r\n# se");
        assert_eq!(h.session.buffer(), b"se");
    }

    #[test]
    fn test_eot_on_empty_buffer_exits() {
        let mut h = Harness::activated();
        let (status, text) = h.feed(&[EOT, b'x']);
        assert_eq!(status, Status::Exited(ResetKind::Warm));
        assert_eq!(text, "bye");
        assert!(!h.session.is_active());
        assert_eq!(h.engine.resets, [ResetKind::Warm]);
    }

    #[test]
    fn test_eot_with_text_is_ignored() {
        let mut h = Harness::activated();
        h.feed(b"se");
        let (status, _) = h.feed(&[EOT]);
        assert_eq!(status, Status::Active);
        assert_eq!(h.session.buffer(), b"se");
        assert!(h.engine.resets.is_empty());
    }

    #[test]
    fn test_exit_command_clears_state_before_reset() {
        let mut h = Harness::activated();
        let (status, text) = h.feed(b"exit\r");
        assert_eq!(status, Status::Exited(ResetKind::Warm));
        assert_eq!(text, "exit\r\nbye");
        assert!(h.session.buffer().is_empty());
        assert_eq!(h.session.mode(), Mode::Inactive);
        assert_eq!(h.engine.resets, [ResetKind::Warm]);
    }

    #[test]
    fn test_set_line_through_builtin_commands() {
        use crate::commands::{BUILTINS, OUT_OF_RANGE};
        use crate::types::ParamDescriptor;
        use core::cell::Cell;

        let rc_mid = Cell::new(1500u16);
        let params = [ParamDescriptor::uint16("rc_mid", &rc_mid, 1200, 1700)];
        let registry = Registry::new(&params);
        let mut engine = MockEngine::new();
        let mut session = ConsoleSession::new();

        let mut out = MockOutput::new();
        {
            let mut shell = Shell::new(&mut out, &registry, &mut engine, &BUILTINS);
            session.activate(&mut shell);
        }
        assert!(session.is_active());
        assert!(out.text().contains("TestFC 1.0"));
        assert!(out.text().ends_with(PROMPT));

        let mut feed = |bytes: &[u8]| {
            let mut out = MockOutput::new();
            let mut shell = Shell::new(&mut out, &registry, &mut engine, &BUILTINS);
            let status = session.process_bytes(bytes, &mut shell);
            (status, out.text())
        };

        let (status, text) = feed(b"set rc_mid=50\r");
        assert_eq!(status, Status::Active);
        assert_eq!(text, std::format!("set rc_mid=50\r\n{}{}", OUT_OF_RANGE, PROMPT));
        assert_eq!(rc_mid.get(), 1500);

        let (status, text) = feed(b"set rc_mid=1600\r");
        assert_eq!(status, Status::Active);
        assert_eq!(text, std::format!("set rc_mid=1600\r\nrc_mid set to 1600{}", PROMPT));
        assert_eq!(rc_mid.get(), 1600);

        let (_, text) = feed(b"set rc_mid\r");
        assert_eq!(text, std::format!("set rc_mid\r\nrc_mid = 1600\r\n{}", PROMPT));
    }
}