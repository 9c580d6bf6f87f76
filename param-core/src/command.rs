//! Command table and dispatcher.
//!
//! Commands live in a static table sorted by name, ignoring case. The
//! ordering is checked by [`CommandTable::new`], which is a `const fn`: a
//! mis-sorted table declared as a `const` fails to compile.
//!
//! # Example
//!
//! ```
//! use param_core::{Command, CommandTable, Shell};
//!
//! fn hello(shell: &mut Shell<'_, '_>, _args: &str) {
//!     shell.print("hello");
//! }
//!
//! const COMMANDS: &[Command] = &[
//!     Command::new("hello", "say hello", hello),
//!     Command::new("help", "list commands", hello),
//! ];
//! const TABLE: CommandTable = CommandTable::new(COMMANDS);
//!
//! assert!(TABLE.lookup("HELLO").is_some());
//! assert_eq!(TABLE.completions("he").len(), 2);
//! ```

use core::cmp::Ordering;
use core::fmt;

use crate::engine::{Engine, ResetKind};
use crate::name::{cmp_ignore_case, starts_with_ignore_case};
use crate::output::ConsoleOutput;
use crate::registry::Registry;

/// Printed when the first word of a line names no command.
pub const UNKNOWN_COMMAND: &str = "Unknown command, try 'help'";

/// Command handler. Receives everything after the first space.
pub type Handler = fn(&mut Shell<'_, '_>, &str);

/// One console command.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub help: &'static str,
    pub handler: Handler,
}

impl Command {
    #[must_use]
    pub const fn new(name: &'static str, help: &'static str, handler: Handler) -> Self {
        Self {
            name,
            help,
            handler,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}

/// A name-sorted set of commands.
#[derive(Debug, Clone, Copy)]
pub struct CommandTable {
    commands: &'static [Command],
}

impl CommandTable {
    /// Wrap a command slice.
    ///
    /// # Panics
    ///
    /// If the names are not strictly ascending, ignoring case. In a `const`
    /// context this is a compile error.
    #[must_use]
    pub const fn new(commands: &'static [Command]) -> Self {
        let mut i = 1;
        while i < commands.len() {
            let order = cmp_ignore_case(
                commands[i - 1].name.as_bytes(),
                commands[i].name.as_bytes(),
            );
            assert!(matches!(order, Ordering::Less), "command table not sorted");
            i += 1;
        }
        Self { commands }
    }

    /// All commands in name order.
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &'static [Command] {
        self.commands
    }

    /// Exact command match, ignoring case.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&'static Command> {
        let commands = self.commands;
        commands
            .binary_search_by(|cmd| cmp_ignore_case(cmd.name.as_bytes(), token.as_bytes()))
            .ok()
            .map(|index| &commands[index])
    }

    /// Every command starting with `partial`, ignoring case, in table order.
    ///
    /// Matches of a prefix form a contiguous run in a sorted table.
    #[must_use]
    pub fn completions(&self, partial: &str) -> &'static [Command] {
        let commands = self.commands;
        let start = commands.partition_point(|cmd| {
            cmp_ignore_case(cmd.name.as_bytes(), partial.as_bytes()) == Ordering::Less
        });
        let len = commands[start..]
            .iter()
            .take_while(|cmd| starts_with_ignore_case(cmd.name, partial))
            .count();
        &commands[start..start + len]
    }
}

/// Split a line into its command word and the remainder.
#[must_use]
pub fn split_command(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

/// Everything a command handler may use while it runs.
///
/// Borrowed for the duration of one console step. Implements
/// [`core::fmt::Write`] so handlers can use `write!`.
pub struct Shell<'s, 'r> {
    out: &'s mut dyn ConsoleOutput,
    registry: &'s Registry<'r>,
    engine: &'s mut dyn Engine,
    commands: &'s CommandTable,
    exit: Option<ResetKind>,
}

impl<'s, 'r> Shell<'s, 'r> {
    pub fn new(
        out: &'s mut dyn ConsoleOutput,
        registry: &'s Registry<'r>,
        engine: &'s mut dyn Engine,
        commands: &'s CommandTable,
    ) -> Self {
        Self {
            out,
            registry,
            engine,
            commands,
            exit: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &'s Registry<'r> {
        self.registry
    }

    #[inline]
    #[must_use]
    pub fn commands(&self) -> &'s CommandTable {
        self.commands
    }

    #[inline]
    pub fn engine(&mut self) -> &mut dyn Engine {
        &mut *self.engine
    }

    /// Output and engine at once, for engine calls that print.
    #[inline]
    pub fn split(&mut self) -> (&mut dyn ConsoleOutput, &mut dyn Engine) {
        (&mut *self.out, &mut *self.engine)
    }

    #[inline]
    pub fn print(&mut self, text: &str) {
        self.out.print(text);
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.write_bytes(bytes);
    }

    /// Formatted output. Console output cannot fail.
    #[inline]
    pub fn print_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = fmt::Write::write_fmt(self, args);
    }

    /// Ask the console to close after the current command and restart.
    pub fn request_exit(&mut self, kind: ResetKind) {
        self.exit = Some(kind);
    }

    #[inline]
    #[must_use]
    pub fn exit_requested(&self) -> Option<ResetKind> {
        self.exit
    }

    pub(crate) fn take_exit(&mut self) -> Option<ResetKind> {
        self.exit.take()
    }

    /// Run one command line. Unknown commands print [`UNKNOWN_COMMAND`].
    ///
    /// Returns `true` if a command was found.
    pub fn dispatch(&mut self, line: &str) -> bool {
        let (token, args) = split_command(line);
        match self.commands.lookup(token) {
            Some(cmd) => {
                trace!("console command: {}", cmd.name);
                (cmd.handler)(self, args);
                true
            }
            None => {
                self.print(UNKNOWN_COMMAND);
                false
            }
        }
    }
}

impl fmt::Write for Shell<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.print(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::testing::{MockEngine, MockOutput};
    use std::vec::Vec;

    fn noop(_shell: &mut Shell<'_, '_>, _args: &str) {}

    fn echo(shell: &mut Shell<'_, '_>, args: &str) {
        shell.print_fmt(format_args!("[{}]", args));
    }

    const COMMANDS: &[Command] = &[
        Command::new("dump", "", noop),
        Command::new("echo", "", echo),
        Command::new("exit", "", noop),
        Command::new("feature", "", noop),
        Command::new("mixer", "", noop),
        Command::new("save", "", noop),
        Command::new("set", "", noop),
        Command::new("status", "", noop),
    ];
    const TABLE: CommandTable = CommandTable::new(COMMANDS);

    fn names(commands: &[Command]) -> Vec<&'static str> {
        commands.iter().map(|cmd| cmd.name).collect()
    }

    #[test]
    fn test_lookup_exact_ignoring_case() {
        assert_eq!(TABLE.lookup("mixer").map(|c| c.name), Some("mixer"));
        assert_eq!(TABLE.lookup("SET").map(|c| c.name), Some("set"));
        assert!(TABLE.lookup("se").is_none());
        assert!(TABLE.lookup("sets").is_none());
        assert!(TABLE.lookup("").is_none());
    }

    #[test]
    fn test_completions_in_table_order() {
        assert_eq!(names(TABLE.completions("s")), ["save", "set", "status"]);
        assert_eq!(names(TABLE.completions("SE")), ["set"]);
        assert_eq!(names(TABLE.completions("e")), ["echo", "exit"]);
        assert_eq!(names(TABLE.completions("mi")), ["mixer"]);
        assert!(TABLE.completions("x").is_empty());
        assert!(TABLE.completions("set rc").is_empty());
        assert_eq!(TABLE.completions("").len(), TABLE.commands().len());
    }

    #[test]
    fn test_completions_are_deterministic() {
        for partial in ["", "s", "st", "f", "q"] {
            assert_eq!(
                names(TABLE.completions(partial)),
                names(TABLE.completions(partial))
            );
        }
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("set rc_mid=1500"), ("set", "rc_mid=1500"));
        assert_eq!(split_command("help"), ("help", ""));
        assert_eq!(split_command("mixer "), ("mixer", ""));
        assert_eq!(split_command("set  x"), ("set", " x"));
    }

    #[test]
    fn test_dispatch_passes_remainder() {
        let registry = Registry::new(&[]);
        let mut out = MockOutput::new();
        let mut engine = MockEngine::new();
        let mut shell = Shell::new(&mut out, &registry, &mut engine, &TABLE);

        assert!(shell.dispatch("echo a b c"));
        assert!(shell.dispatch("ECHO"));
        assert!(!shell.dispatch("bogus 1 2"));
        assert_eq!(out.text(), "[a b c][]Unknown command, try 'help'");
    }

    #[test]
    fn test_exit_request_is_taken_once() {
        let registry = Registry::new(&[]);
        let mut out = MockOutput::new();
        let mut engine = MockEngine::new();
        let mut shell = Shell::new(&mut out, &registry, &mut engine, &TABLE);

        assert_eq!(shell.exit_requested(), None);
        shell.request_exit(ResetKind::Bootloader);
        assert_eq!(shell.take_exit(), Some(ResetKind::Bootloader));
        assert_eq!(shell.take_exit(), None);
    }

    #[test]
    #[should_panic(expected = "command table not sorted")]
    fn test_unsorted_table_rejected() {
        const UNSORTED: &[Command] = &[
            Command::new("set", "", noop),
            Command::new("save", "", noop),
        ];
        let _ = CommandTable::new(UNSORTED);
    }
}
